//! The fundamental selection data structure: a single-channel 8-bit
//! opacity buffer over an image-sized grid.
//!
//! A [`PixelMask`] stores one strength value per pixel, row-major,
//! `index = y * width + x`. Zero means unselected, 255 fully selected,
//! intermediate values are partial/feathered coverage.
//!
//! Masks are value types: every transform in this crate takes a mask by
//! reference and returns a new one, and the session clones snapshots
//! into history. Nothing holds a mutable alias across snapshots, which
//! is what makes undo/redo correct by construction.

use image::GrayImage;

use crate::types::{Bounds, Dimensions};

/// Strength threshold above which a pixel counts toward the selection
/// bounds. Matches the editor's marching-ants behavior: feathered
/// fringe below half strength does not extend the bounding box.
const BOUNDS_THRESHOLD: u8 = 128;

/// A per-pixel selection strength buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelMask {
    data: Vec<u8>,
    dimensions: Dimensions,
}

impl PixelMask {
    /// Create an all-zero (fully unselected) mask.
    #[must_use]
    pub fn new(dimensions: Dimensions) -> Self {
        Self {
            data: vec![0; dimensions.pixel_count()],
            dimensions,
        }
    }

    /// Build a mask from a raw buffer.
    ///
    /// Returns `None` when the buffer length does not equal
    /// `width * height`.
    #[must_use]
    pub fn from_raw(dimensions: Dimensions, data: Vec<u8>) -> Option<Self> {
        (data.len() == dimensions.pixel_count()).then_some(Self { data, dimensions })
    }

    /// The mask's dimensions.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.dimensions.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.dimensions.height
    }

    /// Flat index of `(x, y)`. Assumes the coordinate is in bounds.
    #[must_use]
    pub const fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.dimensions.width as usize + x as usize
    }

    /// Strength at `(x, y)`. Assumes the coordinate is in bounds.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.data[self.index(x, y)]
    }

    /// Set the strength at `(x, y)`. Assumes the coordinate is in bounds.
    pub fn set(&mut self, x: u32, y: u32, value: u8) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    /// The raw strength buffer, row-major.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access to the raw strength buffer.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Sum of all strength values. Used by feather's approximate
    /// mass-preservation property and by area heuristics.
    #[must_use]
    pub fn total_strength(&self) -> u64 {
        self.data.iter().map(|&v| u64::from(v)).sum()
    }

    /// Returns `true` if no pixel is selected at any strength.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|&v| v == 0)
    }

    /// Bounding box of the selected region, or `None` when no pixel
    /// exceeds the half-strength threshold.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        let mut found: Option<Bounds> = None;
        for y in 0..self.height() {
            for x in 0..self.width() {
                if self.get(x, y) > BOUNDS_THRESHOLD {
                    found = Some(match found {
                        None => Bounds {
                            min_x: x,
                            min_y: y,
                            max_x: x,
                            max_y: y,
                        },
                        Some(b) => Bounds {
                            min_x: b.min_x.min(x),
                            min_y: b.min_y.min(y),
                            max_x: b.max_x.max(x),
                            max_y: b.max_y.max(y),
                        },
                    });
                }
            }
        }
        found
    }

    /// View the mask as a grayscale image (copies the buffer).
    ///
    /// `GrayImage` is the interchange type for raster tooling (blur
    /// previews, debugging dumps, PNG export of the matte).
    #[must_use]
    pub fn to_gray(&self) -> GrayImage {
        // Length invariant guarantees from_raw succeeds.
        GrayImage::from_raw(self.width(), self.height(), self.data.clone())
            .unwrap_or_else(|| GrayImage::new(self.width(), self.height()))
    }

    /// Build a mask from a grayscale image.
    #[must_use]
    pub fn from_gray(image: &GrayImage) -> Self {
        Self {
            dimensions: Dimensions::new(image.width(), image.height()),
            data: image.as_raw().clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_mask_is_blank_with_full_length() {
        let mask = PixelMask::new(Dimensions::new(7, 3));
        assert!(mask.is_blank());
        assert_eq!(mask.as_slice().len(), 21);
        assert!(mask.bounds().is_none());
    }

    #[test]
    fn from_raw_rejects_wrong_length() {
        assert!(PixelMask::from_raw(Dimensions::new(4, 4), vec![0; 15]).is_none());
        assert!(PixelMask::from_raw(Dimensions::new(4, 4), vec![0; 16]).is_some());
    }

    #[test]
    fn index_is_row_major() {
        let mask = PixelMask::new(Dimensions::new(10, 5));
        assert_eq!(mask.index(0, 0), 0);
        assert_eq!(mask.index(3, 2), 23);
    }

    #[test]
    fn set_and_get_round_trip() {
        let mut mask = PixelMask::new(Dimensions::new(4, 4));
        mask.set(2, 1, 200);
        assert_eq!(mask.get(2, 1), 200);
        assert_eq!(mask.get(1, 2), 0);
    }

    #[test]
    fn bounds_covers_selected_pixels_only() {
        let mut mask = PixelMask::new(Dimensions::new(8, 8));
        mask.set(2, 3, 255);
        mask.set(5, 6, 255);
        assert_eq!(
            mask.bounds(),
            Some(Bounds {
                min_x: 2,
                min_y: 3,
                max_x: 5,
                max_y: 6,
            }),
        );
    }

    #[test]
    fn bounds_ignores_weak_fringe() {
        let mut mask = PixelMask::new(Dimensions::new(4, 4));
        mask.set(0, 0, 128); // At the threshold, not above it.
        assert!(mask.bounds().is_none());
        mask.set(0, 0, 129);
        assert!(mask.bounds().is_some());
    }

    #[test]
    fn gray_round_trip_preserves_buffer() {
        let mut mask = PixelMask::new(Dimensions::new(3, 2));
        mask.set(1, 0, 77);
        mask.set(2, 1, 255);
        let back = PixelMask::from_gray(&mask.to_gray());
        assert_eq!(mask, back);
    }

    #[test]
    fn total_strength_sums_values() {
        let mut mask = PixelMask::new(Dimensions::new(2, 2));
        mask.set(0, 0, 10);
        mask.set(1, 1, 20);
        assert_eq!(mask.total_strength(), 30);
    }
}
