//! Morphological mask transforms: erode, dilate, and Gaussian feather.
//!
//! All three are pure take-and-return functions over a [`PixelMask`]:
//! the input is never modified and the output has identical dimensions.
//! Out-of-bounds neighborhood queries use replicate-clamp semantics --
//! a selection touching the image edge is not shrunk by phantom zero
//! pixels outside the frame.

use crate::mask::PixelMask;

/// Shrink the selected region: each pixel becomes the minimum strength
/// found in its `(2*radius + 1)^2` square neighborhood.
///
/// Removes thin protrusions and single-pixel noise. `radius == 0`
/// returns a copy of the input.
#[must_use = "returns the eroded mask"]
pub fn erode(mask: &PixelMask, radius: u32) -> PixelMask {
    neighborhood_extremum(mask, radius, u8::min, u8::MAX)
}

/// Grow the selected region: each pixel becomes the maximum strength
/// found in its `(2*radius + 1)^2` square neighborhood.
///
/// Fills small gaps and reconnects fragmented regions. `radius == 0`
/// returns a copy of the input.
#[must_use = "returns the dilated mask"]
pub fn dilate(mask: &PixelMask, radius: u32) -> PixelMask {
    neighborhood_extremum(mask, radius, u8::max, u8::MIN)
}

/// Shared min/max neighborhood sweep behind [`erode`] and [`dilate`].
///
/// Skipping out-of-bounds neighbors is equivalent to replicate-clamp
/// for an extremum: the clamped neighbor duplicates an in-bounds pixel
/// already in the window.
fn neighborhood_extremum(
    mask: &PixelMask,
    radius: u32,
    pick: fn(u8, u8) -> u8,
    identity: u8,
) -> PixelMask {
    if radius == 0 {
        return mask.clone();
    }

    let (width, height) = (mask.width(), mask.height());
    let r = i64::from(radius);
    let mut out = PixelMask::new(mask.dimensions());

    for y in 0..height {
        for x in 0..width {
            let mut extremum = identity;
            for dy in -r..=r {
                for dx in -r..=r {
                    let nx = i64::from(x) + dx;
                    let ny = i64::from(y) + dy;
                    if nx >= 0 && nx < i64::from(width) && ny >= 0 && ny < i64::from(height) {
                        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                        let value = mask.get(nx as u32, ny as u32);
                        extremum = pick(extremum, value);
                    }
                }
            }
            out.set(x, y, extremum);
        }
    }
    out
}

/// Soften the mask's edges with a separable Gaussian blur.
///
/// The kernel is derived from the feather radius the way the editor
/// derives it: `sigma = radius / 2`, kernel half-width = `radius`,
/// weights normalized to sum to one. Boundary samples are replicate-
/// clamped so mass near the image edge is not lost outward.
///
/// `radius == 0` returns a copy of the input.
#[must_use = "returns the feathered mask"]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn feather(mask: &PixelMask, radius: u32) -> PixelMask {
    if radius == 0 {
        return mask.clone();
    }

    let (width, height) = (mask.width() as usize, mask.height() as usize);
    let r = radius as i64;
    let sigma = radius as f32 / 2.0;

    // Normalized 1D Gaussian kernel.
    let mut kernel = Vec::with_capacity(2 * radius as usize + 1);
    let mut kernel_sum = 0.0_f32;
    for i in -r..=r {
        let value = (-(i * i) as f32 / (2.0 * sigma * sigma)).exp();
        kernel.push(value);
        kernel_sum += value;
    }
    for value in &mut kernel {
        *value /= kernel_sum;
    }

    let source = mask.as_slice();
    let mut horizontal = vec![0.0_f32; source.len()];

    // Horizontal pass.
    for y in 0..height {
        for x in 0..width {
            let mut sum = 0.0_f32;
            for (k, weight) in kernel.iter().enumerate() {
                let offset = k as i64 - r;
                let nx = (x as i64 + offset).clamp(0, width as i64 - 1) as usize;
                sum += f32::from(source[y * width + nx]) * weight;
            }
            horizontal[y * width + x] = sum;
        }
    }

    // Vertical pass.
    let mut out = PixelMask::new(mask.dimensions());
    let data = out.as_mut_slice();
    for y in 0..height {
        for x in 0..width {
            let mut sum = 0.0_f32;
            for (k, weight) in kernel.iter().enumerate() {
                let offset = k as i64 - r;
                let ny = (y as i64 + offset).clamp(0, height as i64 - 1) as usize;
                sum += horizontal[ny * width + x] * weight;
            }
            data[y * width + x] = sum.round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}
