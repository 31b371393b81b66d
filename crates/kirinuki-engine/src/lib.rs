//! kirinuki-engine: Pure pixel-mask selection and compositing (sans-IO).
//!
//! Builds interactive selections over an RGBA image from four mask
//! producers:
//! flood fill -> shape rasterization -> brush/eraser stamps ->
//! externally supplied masks, composed through a stateful session with
//! undo/redo, then extracted as a cropped alpha-matted cutout.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! pixel buffers and returns structured data. File loading, remote
//! segmentation transport, and the command line live in
//! `kirinuki-remote` and `kirinuki-cli`.

pub mod brush;
pub mod edge;
pub mod extract;
pub mod flood;
pub mod mask;
pub mod morphology;
pub mod raster;
pub mod session;
pub mod types;

pub use edge::EdgeMap;
pub use extract::Cutout;
pub use flood::{FloodFillResult, FloodFillStats};
pub use mask::PixelMask;
pub use raster::SelectionPath;
pub use session::SelectionSession;
pub use types::{
    Bounds, BrushSettings, BrushTool, Dimensions, EngineError, FloodSettings, Mode, PathPoint,
};
