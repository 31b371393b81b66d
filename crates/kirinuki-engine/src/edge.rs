//! Per-pixel gradient-magnitude map used to bias selection tools
//! toward natural object boundaries.
//!
//! The map is computed once per loaded image (Sobel gradients over the
//! luminance channel, via `imageproc`) and read by the flood fill and
//! the edge-aware eraser for the lifetime of that image. It is a
//! directional hint, not a hard wall: consumers weight by edge strength
//! rather than thresholding it, so weak edges slow a fill without
//! stopping it and the brush can always override.

use image::{Luma, RgbaImage};
use imageproc::definitions::Image;
use imageproc::filter::filter_clamped;
use imageproc::kernel;

use crate::types::Dimensions;

/// Divisor that maps raw Sobel magnitudes into an approximate [0, 1]
/// weight. Magnitudes can exceed 255 on extreme transitions; the
/// weight accessor clamps.
const STRENGTH_SCALE: f32 = 255.0;

/// A read-only gradient-magnitude map over a source image.
#[derive(Debug, Clone)]
pub struct EdgeMap {
    magnitudes: Vec<f32>,
    dimensions: Dimensions,
}

impl EdgeMap {
    /// Compute the edge map for a source image.
    ///
    /// Converts to grayscale, applies the horizontal and vertical 3x3
    /// Sobel kernels with clamped (replicate) borders, and stores the
    /// gradient magnitude `hypot(gx, gy)` per pixel. Deterministic and
    /// side-effect free.
    #[must_use = "returns the computed edge map"]
    pub fn compute(image: &RgbaImage) -> Self {
        let gray = image::imageops::grayscale(image);
        let gx: Image<Luma<i16>> = filter_clamped(&gray, kernel::SOBEL_HORIZONTAL_3X3);
        let gy: Image<Luma<i16>> = filter_clamped(&gray, kernel::SOBEL_VERTICAL_3X3);

        let magnitudes = gx
            .iter()
            .zip(gy.iter())
            .map(|(h, v)| f32::from(*h).hypot(f32::from(*v)))
            .collect();

        Self {
            magnitudes,
            dimensions: Dimensions::new(image.width(), image.height()),
        }
    }

    /// The map's dimensions (always equal to the source image's).
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Raw gradient magnitude at a flat index.
    #[must_use]
    pub fn magnitude(&self, index: usize) -> f32 {
        self.magnitudes[index]
    }

    /// Edge weight in [0, 1] at a flat index: the magnitude scaled by
    /// 1/255 and clamped.
    #[must_use]
    pub fn strength(&self, index: usize) -> f32 {
        (self.magnitudes[index] / STRENGTH_SCALE).clamp(0.0, 1.0)
    }

    /// All raw magnitudes, row-major.
    #[must_use]
    pub fn magnitudes(&self) -> &[f32] {
        &self.magnitudes
    }
}
