//! Request/response types for the segmentation service, plus the
//! data-URL image encoding the service expects.
//!
//! The wire shapes mirror the service's JSON contract exactly; field
//! names that collide with Rust keywords are renamed via serde. The
//! transport itself is out of scope here: embedding shells serialize
//! these types over whatever channel they have.

use std::io::Cursor;

use base64::{Engine, engine::general_purpose::STANDARD};
use image::{ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::RemoteError;
use crate::rle::RleMask;

/// A point hint in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointHint {
    /// Column.
    pub x: i64,
    /// Row.
    pub y: i64,
}

/// A segmentation request: the full image plus a click/box prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentRequest {
    /// The source image as a base64 PNG data URL.
    pub image: String,
    /// Point prompt, usually the user's click.
    pub point: PointHint,
    /// Box prompt `[x0, y0, x1, y1]`; degenerate (`[x, y, x, y]`) when
    /// only a point is known.
    #[serde(rename = "box")]
    pub box_hint: [i64; 4],
}

impl SegmentRequest {
    /// Build a request from a click point. The box hint degenerates to
    /// the point itself.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::ImageEncode`] when the image cannot be
    /// PNG-encoded.
    pub fn from_point(image: &RgbaImage, x: i64, y: i64) -> Result<Self, RemoteError> {
        Ok(Self {
            image: encode_image_data_url(image)?,
            point: PointHint { x, y },
            box_hint: [x, y, x, y],
        })
    }

    /// Build a request from an object box. The point prompt is the box
    /// center, which anchors the service on the object the box frames.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::ImageEncode`] when the image cannot be
    /// PNG-encoded.
    pub fn from_box(image: &RgbaImage, box_hint: [i64; 4]) -> Result<Self, RemoteError> {
        let [x0, y0, x1, y1] = box_hint;
        Ok(Self {
            image: encode_image_data_url(image)?,
            point: PointHint {
                x: i64::midpoint(x0, x1),
                y: i64::midpoint(y0, y1),
            },
            box_hint,
        })
    }
}

/// A segmentation response. `success == true` with a present mask is
/// the only shape the adapter accepts; everything else falls back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SegmentResponse {
    /// Whether the service produced a mask.
    pub success: bool,
    /// The mask, present on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<RleMask>,
    /// Human-readable failure reason, present on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Encode an image as a `data:image/png;base64,...` URL.
///
/// # Errors
///
/// Returns [`RemoteError::ImageEncode`] when PNG encoding fails.
pub fn encode_image_data_url(image: &RgbaImage) -> Result<String, RemoteError> {
    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| RemoteError::ImageEncode(e.to_string()))?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}
