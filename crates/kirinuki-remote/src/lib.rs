//! kirinuki-remote: Remote segmentation boundary for kirinuki.
//!
//! Everything needed to talk to an object-segmentation service except
//! the transport itself: the JSON wire types, base64 PNG data-URL
//! image encoding, the run-length mask codec, and the orchestration
//! that falls back to the local flood fill whenever the remote path
//! fails. Embedding shells supply the transport by implementing
//! [`SegmentationBackend`].

pub mod adapter;
pub mod error;
pub mod rle;
pub mod wire;

pub use adapter::{SegmentationBackend, SegmentationSource, segment_with_fallback};
pub use error::RemoteError;
pub use rle::RleMask;
pub use wire::{PointHint, SegmentRequest, SegmentResponse, encode_image_data_url};
