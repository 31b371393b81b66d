//! Shared types for the kirinuki selection engine.

use serde::{Deserialize, Serialize};

/// Re-export `RgbaImage` so downstream crates can reference source
/// pixel data without depending on `image` directly.
pub use image::RgbaImage;

/// Re-export `GrayImage` for mask interchange with raster tooling.
pub use image::GrayImage;

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Create new dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total pixel count (`width * height`).
    #[must_use]
    pub const fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns `true` if `(x, y)` lies within `[0, width) x [0, height)`.
    #[must_use]
    pub const fn contains(self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }
}

/// Axis-aligned bounding box of a mask's selected region.
///
/// Coordinates are inclusive pixel positions of selected pixels.
/// Derived from the mask, never stored independently; an all-zero mask
/// has no bounds (`None` at the call sites that compute it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    /// Leftmost selected column.
    pub min_x: u32,
    /// Topmost selected row.
    pub min_y: u32,
    /// Rightmost selected column.
    pub max_x: u32,
    /// Bottommost selected row.
    pub max_y: u32,
}

impl Bounds {
    /// Width of the box using the editor's crop arithmetic
    /// (`max_x - min_x`), floored at one pixel so a single-pixel
    /// selection still produces output.
    #[must_use]
    pub const fn crop_width(self) -> u32 {
        let w = self.max_x - self.min_x;
        if w == 0 { 1 } else { w }
    }

    /// Height of the box (`max_y - min_y`), floored at one pixel.
    #[must_use]
    pub const fn crop_height(self) -> u32 {
        let h = self.max_y - self.min_y;
        if h == 0 { 1 } else { h }
    }
}

/// How a candidate mask combines into the working selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Union: `working = max(working, candidate)`. Strength-preserving
    /// and idempotent.
    #[default]
    Add,
    /// Difference: `working = working - candidate`, saturating at zero.
    Subtract,
}

/// Which stamping tool a stroke uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrushTool {
    /// Plain soft brush: paints selection strength in the direction of
    /// the current [`Mode`].
    #[default]
    Brush,
    /// Edge-aware eraser: strength is boosted near detected edges and
    /// the sign is inverted relative to the current [`Mode`], so the
    /// tool repels the selection boundary instead of painting it.
    Eraser,
}

/// Settings for the flood-fill region grower.
///
/// Ranges document the UI slider extents; out-of-range values are
/// clamped at the point of use rather than rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloodSettings {
    /// Maximum Euclidean RGB distance from the seed color (8-80).
    pub tolerance: f32,

    /// Weight applied to edge-map strength when deciding whether to
    /// cross a boundary (40-95). Higher values make the fill harder to
    /// push through strong edges even when colors match.
    pub edge_detection: f32,

    /// Morphological smoothing applied to the raw filled region before
    /// it is returned (0-80). Zero disables the pass.
    pub smoothing: f32,

    /// Soft-edge radius in pixels requested by the caller (0-10).
    ///
    /// Advisory: the fill itself returns a binary region; feathering is
    /// applied by the caller via [`crate::morphology::feather`].
    pub feather: u32,

    /// Minimum region size in pixels. Recorded in
    /// [`FloodFillStats`](crate::flood::FloodFillStats) for callers
    /// that want to reject tiny regions; the fill itself never
    /// discards its result.
    pub min_area: u32,
}

impl Default for FloodSettings {
    fn default() -> Self {
        Self {
            tolerance: 32.0,
            edge_detection: 75.0,
            smoothing: 40.0,
            feather: 2,
            min_area: 100,
        }
    }
}

/// Settings for brush and eraser stamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrushSettings {
    /// Brush diameter in pixels (5-100).
    pub size: f32,

    /// Falloff hardness as a percentage (0-100). Higher values steepen
    /// the falloff toward a binary stamp; zero leaves the linear ramp.
    pub hardness: f32,

    /// Stamp opacity as a percentage (10-100).
    pub opacity: f32,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            size: 20.0,
            hardness: 80.0,
            opacity: 100.0,
        }
    }
}

/// A 2D point in pixel space, used for lasso/rectangle/ellipse paths.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    /// Horizontal position (pixels from left edge).
    pub x: f64,
    /// Vertical position (pixels from top edge).
    pub y: f64,
}

impl PathPoint {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Errors that can occur inside the selection engine.
///
/// All variants are local and recoverable: a failed operation leaves
/// the session's working mask and history exactly as they were.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineError {
    /// A seed point or coordinate lies outside the image.
    #[error("point ({x}, {y}) is outside the {width}x{height} image")]
    OutOfBounds {
        /// Offending x coordinate.
        x: u32,
        /// Offending y coordinate.
        y: u32,
        /// Image width.
        width: u32,
        /// Image height.
        height: u32,
    },

    /// A candidate mask or source image does not match the session's
    /// dimensions.
    #[error(
        "dimension mismatch: expected {}x{}, got {}x{}",
        expected.width, expected.height, actual.width, actual.height
    )]
    DimensionMismatch {
        /// The dimensions the session was created with.
        expected: Dimensions,
        /// The dimensions actually supplied.
        actual: Dimensions,
    },

    /// Extraction was requested while the selection is empty.
    #[error("cannot extract: the selection is empty")]
    EmptySelection,
}
