//! Run-length codec for binary segmentation masks.
//!
//! The wire format is the compact COCO-style column-major-free variant
//! used by segmentation services: `size = [height, width]` plus a list
//! of run lengths over the row-major pixel sequence, alternating
//! background / foreground and always *starting with background* (the
//! first count is zero when pixel 0 is foreground). Decoded masks are
//! hard 0/255.

use serde::{Deserialize, Serialize};

use kirinuki_engine::{Dimensions, PixelMask};

use crate::error::RemoteError;

/// A run-length encoded binary mask as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RleMask {
    /// `[height, width]`, in that order.
    pub size: [u32; 2],
    /// Alternating run lengths, background first.
    pub counts: Vec<u32>,
}

impl RleMask {
    /// The decoded dimensions (`size` is `[height, width]`).
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.size[1], self.size[0])
    }
}

/// Decode an RLE mask into a hard 0/255 pixel mask.
///
/// # Errors
///
/// Returns [`RemoteError::MalformedRle`] when the counts do not sum to
/// exactly `width * height`.
pub fn decode(rle: &RleMask) -> Result<PixelMask, RemoteError> {
    let dimensions = rle.dimensions();
    let expected = dimensions.pixel_count() as u64;
    let total: u64 = rle.counts.iter().map(|&c| u64::from(c)).sum();
    if total != expected {
        return Err(RemoteError::MalformedRle(format!(
            "counts sum to {total}, expected {expected} for {}x{}",
            dimensions.width, dimensions.height,
        )));
    }

    let mut data = Vec::with_capacity(dimensions.pixel_count());
    let mut foreground = false; // runs start with background
    for &count in &rle.counts {
        let value = if foreground { 255 } else { 0 };
        data.resize(data.len() + count as usize, value);
        foreground = !foreground;
    }

    // Length was validated against the declared size above.
    PixelMask::from_raw(dimensions, data)
        .ok_or_else(|| RemoteError::MalformedRle("decoded length mismatch".into()))
}

/// Encode a mask as alternating background/foreground runs.
///
/// Any nonzero strength counts as foreground. The inverse of
/// [`decode`] for hard masks; soft masks are flattened.
#[must_use = "returns the encoded mask"]
pub fn encode(mask: &PixelMask) -> RleMask {
    let mut counts = Vec::new();
    let mut foreground = false;
    let mut run = 0_u32;

    for &value in mask.as_slice() {
        let is_foreground = value != 0;
        if is_foreground == foreground {
            run += 1;
        } else {
            // Emits a leading zero when pixel 0 is foreground, keeping
            // the background-first alternation.
            counts.push(run);
            foreground = is_foreground;
            run = 1;
        }
    }
    if run > 0 || counts.is_empty() {
        counts.push(run);
    }

    RleMask {
        size: [mask.height(), mask.width()],
        counts,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn decode_background_first_runs() {
        // 4x4: 5 background, 6 foreground, 5 background.
        let rle = RleMask {
            size: [4, 4],
            counts: vec![5, 6, 5],
        };
        let mask = decode(&rle).unwrap();
        assert_eq!(mask.dimensions(), Dimensions::new(4, 4));
        assert_eq!(mask.get(0, 0), 0);
        assert_eq!(mask.get(1, 1), 255); // flat index 5
        assert_eq!(mask.get(2, 2), 255); // flat index 10
        assert_eq!(mask.get(3, 2), 0); // flat index 11
    }

    #[test]
    fn decode_leading_zero_starts_foreground() {
        let rle = RleMask {
            size: [2, 2],
            counts: vec![0, 3, 1],
        };
        let mask = decode(&rle).unwrap();
        assert_eq!(mask.get(0, 0), 255);
        assert_eq!(mask.get(1, 1), 0);
    }

    #[test]
    fn decode_rejects_short_counts() {
        let rle = RleMask {
            size: [4, 4],
            counts: vec![5, 4],
        };
        let err = decode(&rle).unwrap_err();
        assert!(matches!(err, RemoteError::MalformedRle(_)));
        assert!(err.to_string().contains("expected 16"));
    }

    #[test]
    fn decode_rejects_overlong_counts() {
        let rle = RleMask {
            size: [2, 2],
            counts: vec![3, 3],
        };
        assert!(matches!(decode(&rle), Err(RemoteError::MalformedRle(_))));
    }

    #[test]
    fn encode_starts_with_background_count() {
        let mut mask = PixelMask::new(Dimensions::new(4, 2));
        mask.set(2, 0, 255);
        mask.set(3, 0, 255);
        let rle = encode(&mask);
        assert_eq!(rle.size, [2, 4]);
        assert_eq!(rle.counts, vec![2, 2, 4]);
    }

    #[test]
    fn encode_foreground_first_pixel_emits_leading_zero() {
        let mut mask = PixelMask::new(Dimensions::new(3, 1));
        mask.set(0, 0, 255);
        let rle = encode(&mask);
        assert_eq!(rle.counts, vec![0, 1, 2]);
    }

    #[test]
    fn encode_blank_mask_is_one_background_run() {
        let mask = PixelMask::new(Dimensions::new(3, 3));
        let rle = encode(&mask);
        assert_eq!(rle.counts, vec![9]);
        assert_eq!(decode(&rle).unwrap(), mask);
    }

    #[test]
    fn round_trip_preserves_hard_masks() {
        let mut mask = PixelMask::new(Dimensions::new(5, 4));
        for (x, y) in [(0, 0), (1, 0), (4, 1), (2, 2), (3, 2), (4, 3)] {
            mask.set(x, y, 255);
        }
        assert_eq!(decode(&encode(&mask)).unwrap(), mask);
    }

    #[test]
    fn serde_matches_wire_shape() {
        let rle = RleMask {
            size: [2, 3],
            counts: vec![1, 4, 1],
        };
        let json = serde_json::to_string(&rle).unwrap();
        assert_eq!(json, r#"{"size":[2,3],"counts":[1,4,1]}"#);
        let back: RleMask = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rle);
    }
}
