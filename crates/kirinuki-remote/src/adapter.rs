//! Orchestration between the remote segmentation service and the local
//! flood-fill fallback.
//!
//! The transport is pluggable: embedding shells implement
//! [`SegmentationBackend`] over fetch, HTTP, a test double, whatever
//! they have. This module owns the policy around it, which is strict:
//! *any* remote failure (transport error, `success == false`, missing
//! or malformed mask, size mismatch) silently degrades to the local
//! flood fill seeded at the same point, so the user always gets a
//! selection.
//!
//! Staleness is the caller's half of the contract: capture the
//! session's id before issuing a request and compare on completion;
//! the session that asked may have been cancelled while the service
//! was thinking.

use image::RgbaImage;

use kirinuki_engine::{Dimensions, EdgeMap, EngineError, FloodSettings, PixelMask, flood};

use crate::error::RemoteError;
use crate::rle;
use crate::wire::{SegmentRequest, SegmentResponse};

/// A transport capable of submitting a segmentation request.
pub trait SegmentationBackend {
    /// Submit a request and await the service's response.
    ///
    /// Implementations surface transport failures as
    /// [`RemoteError::Transport`]; service-level failure travels inside
    /// a successful response (`success == false`).
    fn segment(
        &self,
        request: SegmentRequest,
    ) -> impl Future<Output = Result<SegmentResponse, RemoteError>> + Send;
}

/// Where the returned mask came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentationSource {
    /// The remote service produced a usable mask.
    Remote,
    /// The remote path failed and the local flood fill answered instead.
    LocalFallback(RemoteError),
}

/// Segment the object at `seed`, falling back to the local flood fill
/// on any remote failure.
///
/// `hint_box` refines the prompt when the caller knows an object box;
/// without one the request degenerates to the seed point. The returned
/// mask always matches the image's dimensions.
///
/// # Errors
///
/// Returns [`EngineError::OutOfBounds`] when `seed` lies outside the
/// image; remote failures are not errors here, they select the
/// fallback path.
pub async fn segment_with_fallback<B: SegmentationBackend>(
    backend: &B,
    image: &RgbaImage,
    edge_map: &EdgeMap,
    seed: (u32, u32),
    hint_box: Option<[i64; 4]>,
    settings: &FloodSettings,
) -> Result<(PixelMask, SegmentationSource), EngineError> {
    match segment_remote(backend, image, seed, hint_box).await {
        Ok(mask) => Ok((mask, SegmentationSource::Remote)),
        Err(reason) => {
            let result = flood::flood_fill(seed.0, seed.1, image, edge_map, settings)?;
            Ok((result.mask, SegmentationSource::LocalFallback(reason)))
        }
    }
}

/// The remote half: build the request, await the response, validate
/// and decode the mask.
async fn segment_remote<B: SegmentationBackend>(
    backend: &B,
    image: &RgbaImage,
    seed: (u32, u32),
    hint_box: Option<[i64; 4]>,
) -> Result<PixelMask, RemoteError> {
    let request = match hint_box {
        Some(hint) => SegmentRequest::from_box(image, hint)?,
        None => SegmentRequest::from_point(image, i64::from(seed.0), i64::from(seed.1))?,
    };

    let response = backend.segment(request).await?;
    if !response.success {
        return Err(RemoteError::Service(
            response.error.unwrap_or_else(|| "unspecified".into()),
        ));
    }
    let rle_mask = response.mask.ok_or(RemoteError::MissingMask)?;

    let expected = Dimensions::new(image.width(), image.height());
    if rle_mask.dimensions() != expected {
        return Err(RemoteError::MalformedRle(format!(
            "mask is {}x{}, image is {}x{}",
            rle_mask.dimensions().width,
            rle_mask.dimensions().height,
            expected.width,
            expected.height,
        )));
    }

    rle::decode(&rle_mask)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::rle::RleMask;
    use image::Rgba;
    use std::pin::pin;
    use std::task::{Context, Poll, Waker};

    /// Drive a future that never suspends (all backends here are
    /// immediately ready) to completion.
    fn run<F: Future>(future: F) -> F::Output {
        let mut future = pin!(future);
        let mut cx = Context::from_waker(Waker::noop());
        match future.as_mut().poll(&mut cx) {
            Poll::Ready(output) => output,
            Poll::Pending => unreachable!("test futures never suspend"),
        }
    }

    /// Left half dark, right half light; the fallback fill seeded on
    /// the left stays on the left.
    fn test_image() -> RgbaImage {
        RgbaImage::from_fn(8, 8, |x, _y| {
            if x < 4 {
                Rgba([20, 20, 20, 255])
            } else {
                Rgba([230, 230, 230, 255])
            }
        })
    }

    struct CannedBackend(Result<SegmentResponse, RemoteError>);

    impl SegmentationBackend for CannedBackend {
        async fn segment(&self, _request: SegmentRequest) -> Result<SegmentResponse, RemoteError> {
            self.0.clone()
        }
    }

    fn full_left_half_rle() -> RleMask {
        // 8x8, each row: 4 foreground then 4 background. Background
        // first overall, so the encoding leads with a zero run.
        let mut counts = vec![0];
        counts.extend(std::iter::repeat_n(4, 16));
        RleMask {
            size: [8, 8],
            counts,
        }
    }

    #[test]
    fn remote_success_uses_the_service_mask() {
        let backend = CannedBackend(Ok(SegmentResponse {
            success: true,
            mask: Some(full_left_half_rle()),
            error: None,
        }));
        let image = test_image();
        let edges = EdgeMap::compute(&image);
        let (mask, source) = run(segment_with_fallback(
            &backend,
            &image,
            &edges,
            (1, 1),
            None,
            &FloodSettings::default(),
        ))
        .unwrap();

        assert_eq!(source, SegmentationSource::Remote);
        assert_eq!(mask.get(0, 0), 255);
        assert_eq!(mask.get(7, 7), 0);
    }

    #[test]
    fn transport_failure_falls_back_to_flood_fill() {
        let backend = CannedBackend(Err(RemoteError::Transport("refused".into())));
        let image = test_image();
        let edges = EdgeMap::compute(&image);
        let settings = FloodSettings {
            smoothing: 0.0,
            ..FloodSettings::default()
        };
        let (mask, source) = run(segment_with_fallback(
            &backend, &image, &edges, (1, 4), None, &settings,
        ))
        .unwrap();

        assert!(matches!(
            source,
            SegmentationSource::LocalFallback(RemoteError::Transport(_)),
        ));
        assert_eq!(mask.get(1, 4), 255, "fallback fill covers the seed");
        assert_eq!(mask.get(6, 4), 0, "fallback fill respects the color boundary");
    }

    #[test]
    fn service_failure_falls_back_with_reason() {
        let backend = CannedBackend(Ok(SegmentResponse {
            success: false,
            mask: None,
            error: Some("no object".into()),
        }));
        let image = test_image();
        let edges = EdgeMap::compute(&image);
        let (_, source) = run(segment_with_fallback(
            &backend,
            &image,
            &edges,
            (1, 1),
            None,
            &FloodSettings::default(),
        ))
        .unwrap();

        assert_eq!(
            source,
            SegmentationSource::LocalFallback(RemoteError::Service("no object".into())),
        );
    }

    #[test]
    fn missing_mask_falls_back() {
        let backend = CannedBackend(Ok(SegmentResponse {
            success: true,
            mask: None,
            error: None,
        }));
        let image = test_image();
        let edges = EdgeMap::compute(&image);
        let (_, source) = run(segment_with_fallback(
            &backend,
            &image,
            &edges,
            (1, 1),
            None,
            &FloodSettings::default(),
        ))
        .unwrap();
        assert_eq!(
            source,
            SegmentationSource::LocalFallback(RemoteError::MissingMask),
        );
    }

    #[test]
    fn wrong_size_mask_falls_back_as_malformed() {
        let backend = CannedBackend(Ok(SegmentResponse {
            success: true,
            mask: Some(RleMask {
                size: [4, 4],
                counts: vec![16],
            }),
            error: None,
        }));
        let image = test_image();
        let edges = EdgeMap::compute(&image);
        let (_, source) = run(segment_with_fallback(
            &backend,
            &image,
            &edges,
            (1, 1),
            None,
            &FloodSettings::default(),
        ))
        .unwrap();
        assert!(matches!(
            source,
            SegmentationSource::LocalFallback(RemoteError::MalformedRle(_)),
        ));
    }

    #[test]
    fn fallback_source_clones_with_its_reason() {
        // The fallback variant owns its failure reason, so the source
        // is clone-not-copy.
        let source = SegmentationSource::LocalFallback(RemoteError::Transport("timeout".into()));
        let kept = source.clone();
        assert_eq!(source, kept);
        assert!(matches!(
            kept,
            SegmentationSource::LocalFallback(RemoteError::Transport(_)),
        ));
    }

    #[test]
    fn out_of_bounds_seed_is_an_error_even_with_remote_down() {
        let backend = CannedBackend(Err(RemoteError::Transport("refused".into())));
        let image = test_image();
        let edges = EdgeMap::compute(&image);
        let result = run(segment_with_fallback(
            &backend,
            &image,
            &edges,
            (99, 1),
            None,
            &FloodSettings::default(),
        ));
        assert!(matches!(result, Err(EngineError::OutOfBounds { .. })));
    }

    #[test]
    fn box_hint_shapes_the_request() {
        struct CapturingBackend;
        impl SegmentationBackend for CapturingBackend {
            async fn segment(
                &self,
                request: SegmentRequest,
            ) -> Result<SegmentResponse, RemoteError> {
                assert_eq!(request.box_hint, [1, 1, 5, 5]);
                assert_eq!((request.point.x, request.point.y), (3, 3));
                Err(RemoteError::Transport("done".into()))
            }
        }
        let image = test_image();
        let edges = EdgeMap::compute(&image);
        let settings = FloodSettings {
            smoothing: 0.0,
            ..FloodSettings::default()
        };
        let (_, source) = run(segment_with_fallback(
            &CapturingBackend,
            &image,
            &edges,
            (1, 1),
            Some([1, 1, 5, 5]),
            &settings,
        ))
        .unwrap();
        assert!(matches!(source, SegmentationSource::LocalFallback(_)));
    }
}
