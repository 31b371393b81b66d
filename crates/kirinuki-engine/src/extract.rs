//! Turn a selection into a standalone RGBA cutout.
//!
//! The cutout is cropped to the selection bounds, copies RGB verbatim
//! from the source, and writes the mask strength into the alpha
//! channel, so partially selected (feathered) pixels come out partially
//! transparent. The source image is never modified.

use image::{Rgba, RgbaImage};

use crate::mask::PixelMask;
use crate::types::{Bounds, Dimensions, EngineError};

/// An extracted selection: an RGBA image plus its placement within the
/// source, so callers can position the cutout as a new layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cutout {
    /// Column of the cutout's left edge in source coordinates.
    pub x: u32,
    /// Row of the cutout's top edge in source coordinates.
    pub y: u32,
    /// The cropped image; alpha carries the mask strength.
    pub image: RgbaImage,
}

/// Crop `source` to `bounds` and matte it with `mask`.
///
/// The crop spans `bounds.crop_width()` by `bounds.crop_height()`
/// pixels starting at `(bounds.min_x, bounds.min_y)`, clipped to the
/// source extents.
///
/// # Errors
///
/// Returns [`EngineError::DimensionMismatch`] when the mask and source
/// image disagree on size.
pub fn extract(
    source: &RgbaImage,
    mask: &PixelMask,
    bounds: Bounds,
) -> Result<Cutout, EngineError> {
    let source_dims = Dimensions::new(source.width(), source.height());
    if mask.dimensions() != source_dims {
        return Err(EngineError::DimensionMismatch {
            expected: mask.dimensions(),
            actual: source_dims,
        });
    }

    let width = bounds.crop_width();
    let height = bounds.crop_height();
    let mut image = RgbaImage::new(width, height);

    for dy in 0..height {
        for dx in 0..width {
            let sx = bounds.min_x + dx;
            let sy = bounds.min_y + dy;
            if !source_dims.contains(sx, sy) {
                continue; // clipped edge of a bounds-floored crop
            }
            let Rgba([r, g, b, _]) = *source.get_pixel(sx, sy);
            image.put_pixel(dx, dy, Rgba([r, g, b, mask.get(sx, sy)]));
        }
    }

    Ok(Cutout {
        x: bounds.min_x,
        y: bounds.min_y,
        image,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn gradient_source(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_fn(w, h, |x, y| {
            Rgba([
                u8::try_from(x * 20).unwrap_or(255),
                u8::try_from(y * 20).unwrap_or(255),
                77,
                255,
            ])
        })
    }

    #[test]
    fn cutout_copies_rgb_and_mattes_alpha() {
        // Bounds span (2,2)..=(4,4), so the crop is 2x2 and the
        // partially selected pixels at (3,2) and (2,3) lie strictly
        // inside it.
        let source = gradient_source(8, 8);
        let mut mask = PixelMask::new(Dimensions::new(8, 8));
        mask.set(2, 2, 255);
        mask.set(3, 2, 180);
        mask.set(2, 3, 129);
        mask.set(4, 2, 255);
        mask.set(2, 4, 255);
        let bounds = mask.bounds().unwrap();

        let cutout = extract(&source, &mask, bounds).unwrap();
        assert_eq!((cutout.x, cutout.y), (2, 2));
        assert_eq!((cutout.image.width(), cutout.image.height()), (2, 2));

        let full = cutout.image.get_pixel(0, 0);
        assert_eq!(full.0, [40, 40, 77, 255]);
        let partial = cutout.image.get_pixel(1, 0);
        assert_eq!(partial.0[3], 180, "alpha carries the mask strength");
        assert_eq!(partial.0[0], 60, "rgb is copied verbatim");
        assert_eq!(cutout.image.get_pixel(0, 1).0[3], 129);
    }

    #[test]
    fn unselected_pixels_inside_bounds_are_transparent() {
        // An L-shaped selection: the box interior not in the selection
        // must come out with alpha zero.
        let source = gradient_source(8, 8);
        let mut mask = PixelMask::new(Dimensions::new(8, 8));
        mask.set(1, 1, 255);
        mask.set(1, 4, 255);
        mask.set(4, 1, 255);
        let bounds = mask.bounds().unwrap();

        let cutout = extract(&source, &mask, bounds).unwrap();
        assert_eq!((cutout.image.width(), cutout.image.height()), (3, 3));
        assert_eq!(cutout.image.get_pixel(0, 0).0[3], 255);
        assert_eq!(cutout.image.get_pixel(2, 2).0[3], 0);
    }

    #[test]
    fn crop_drops_the_last_selected_column_and_row() {
        // The editor's crop arithmetic is width = max_x - min_x, so a
        // selection spanning columns 2..=4 yields a 2-wide cutout and
        // source column 4 is not part of it.
        let source = gradient_source(8, 8);
        let mut mask = PixelMask::new(Dimensions::new(8, 8));
        for y in 2..=4 {
            for x in 2..=4 {
                mask.set(x, y, 255);
            }
        }
        let bounds = mask.bounds().unwrap();
        assert_eq!((bounds.max_x, bounds.max_y), (4, 4));

        let cutout = extract(&source, &mask, bounds).unwrap();
        assert_eq!((cutout.image.width(), cutout.image.height()), (2, 2));
        assert_eq!((cutout.x, cutout.y), (2, 2));
        for px in cutout.image.pixels() {
            assert_eq!(px.0[3], 255, "the cropped interior is fully selected");
        }
    }

    #[test]
    fn single_pixel_selection_yields_one_pixel_image() {
        let source = gradient_source(6, 6);
        let mut mask = PixelMask::new(Dimensions::new(6, 6));
        mask.set(4, 2, 255);
        let bounds = mask.bounds().unwrap();

        let cutout = extract(&source, &mask, bounds).unwrap();
        assert_eq!((cutout.image.width(), cutout.image.height()), (1, 1));
        assert_eq!((cutout.x, cutout.y), (4, 2));
        assert_eq!(cutout.image.get_pixel(0, 0).0[3], 255);
    }

    #[test]
    fn selection_touching_far_edge_stays_in_bounds() {
        // A single selected pixel in the bottom-right corner floors the
        // crop to 1x1; the clipped read must not panic.
        let source = gradient_source(5, 5);
        let mut mask = PixelMask::new(Dimensions::new(5, 5));
        mask.set(4, 4, 255);
        let bounds = mask.bounds().unwrap();

        let cutout = extract(&source, &mask, bounds).unwrap();
        assert_eq!((cutout.image.width(), cutout.image.height()), (1, 1));
    }

    #[test]
    fn mismatched_mask_is_rejected() {
        let source = gradient_source(5, 5);
        let mask = PixelMask::new(Dimensions::new(4, 4));
        let bounds = Bounds {
            min_x: 0,
            min_y: 0,
            max_x: 1,
            max_y: 1,
        };
        assert!(matches!(
            extract(&source, &mask, bounds),
            Err(EngineError::DimensionMismatch { .. }),
        ));
    }

    #[test]
    fn source_image_is_untouched() {
        let source = gradient_source(6, 6);
        let before = source.clone();
        let mut mask = PixelMask::new(Dimensions::new(6, 6));
        mask.set(2, 2, 255);
        let bounds = mask.bounds().unwrap();
        let _cutout = extract(&source, &mask, bounds).unwrap();
        assert_eq!(source, before);
    }
}
