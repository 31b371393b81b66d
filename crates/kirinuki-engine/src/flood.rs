//! Seed-point flood fill ("magic" selection): region growing driven by
//! color similarity to the seed, biased away from detected edges.
//!
//! A pixel joins the region when its RGB distance to the *seed* color
//! fits within a tolerance that shrinks near strong edges:
//!
//! ```text
//! accept if color_distance <= tolerance * (1 - edge_weight * edge_strength)
//! ```
//!
//! where `edge_weight = edge_detection / 100`. Strong edges therefore
//! make the fill harder to cross without ever becoming an absolute
//! wall. Growth is breadth-first over 4-connected neighbors with a
//! visited set, so every pixel is examined at most once and the fill
//! always terminates in O(width * height).
//!
//! The raw region is binary (0/255). A light morphological smoothing
//! pass runs when `smoothing > 0`; feathering is *not* applied here --
//! callers delegate that to [`crate::morphology::feather`].

use std::collections::VecDeque;

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::edge::EdgeMap;
use crate::mask::PixelMask;
use crate::morphology;
use crate::types::{Dimensions, EngineError, FloodSettings};

/// Result of a flood fill: the candidate mask plus run statistics.
#[derive(Debug, Clone)]
pub struct FloodFillResult {
    /// The filled region, 255 inside and 0 outside.
    pub mask: PixelMask,
    /// Statistics for instrumentation and caller-side policies.
    pub stats: FloodFillStats,
}

/// Statistics from a single flood-fill run.
///
/// Permanent instrumentation for parameter tuning, in the same spirit
/// as pipeline stage diagnostics: every run reports what it visited
/// and how long it took. The duration serializes as fractional seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloodFillStats {
    /// RGB color of the seed pixel.
    pub seed_color: [u8; 3],
    /// Pixels examined (dequeued) during growth.
    pub pixels_visited: u64,
    /// Pixels accepted into the region before smoothing.
    pub pixels_selected: u64,
    /// Whether the selected area reached `settings.min_area`. The fill
    /// returns the region either way; this flag lets callers apply
    /// their own minimum-size policy.
    pub reached_min_area: bool,
    /// Wall-clock duration of the fill, in seconds.
    pub duration_secs: f64,
}

/// Grow a selection region from a seed point.
///
/// The seed must lie inside the image; callers clamp pointer
/// coordinates before invoking. On a zero-variance image every pixel
/// matches the seed, so the whole frame is selected -- correct, though
/// front ends may want to surface a warning.
///
/// Deterministic: identical seed, image, edge map, and settings produce
/// a byte-identical mask.
///
/// # Errors
///
/// Returns [`EngineError::OutOfBounds`] when the seed lies outside the
/// image, and [`EngineError::DimensionMismatch`] when the edge map was
/// computed for a different image size.
pub fn flood_fill(
    seed_x: u32,
    seed_y: u32,
    image: &RgbaImage,
    edge_map: &EdgeMap,
    settings: &FloodSettings,
) -> Result<FloodFillResult, EngineError> {
    let dimensions = Dimensions::new(image.width(), image.height());
    if !dimensions.contains(seed_x, seed_y) {
        return Err(EngineError::OutOfBounds {
            x: seed_x,
            y: seed_y,
            width: dimensions.width,
            height: dimensions.height,
        });
    }
    if edge_map.dimensions() != dimensions {
        return Err(EngineError::DimensionMismatch {
            expected: dimensions,
            actual: edge_map.dimensions(),
        });
    }

    let started = Instant::now();
    let (width, height) = (dimensions.width, dimensions.height);

    let tolerance = settings.tolerance.max(0.0);
    let edge_weight = (settings.edge_detection / 100.0).clamp(0.0, 1.0);

    let seed_pixel = image.get_pixel(seed_x, seed_y).0;
    let seed_color = [seed_pixel[0], seed_pixel[1], seed_pixel[2]];

    let mut mask = PixelMask::new(dimensions);
    let mut visited = vec![false; dimensions.pixel_count()];
    let mut queue: VecDeque<(u32, u32)> = VecDeque::new();

    visited[mask.index(seed_x, seed_y)] = true;
    queue.push_back((seed_x, seed_y));

    let mut pixels_visited = 0_u64;
    let mut pixels_selected = 0_u64;

    while let Some((x, y)) = queue.pop_front() {
        pixels_visited += 1;
        let idx = mask.index(x, y);

        let pixel = image.get_pixel(x, y).0;
        let distance = color_distance(seed_color, [pixel[0], pixel[1], pixel[2]]);
        let limit = tolerance * (1.0 - edge_weight * edge_map.strength(idx));

        if distance > limit {
            continue;
        }

        mask.set(x, y, 255);
        pixels_selected += 1;

        // Enqueue unvisited 4-connected neighbors. Rejected pixels stay
        // visited and are never re-examined.
        let neighbors = [
            (x.wrapping_add(1), y),
            (x.wrapping_sub(1), y),
            (x, y.wrapping_add(1)),
            (x, y.wrapping_sub(1)),
        ];
        for (nx, ny) in neighbors {
            if nx < width && ny < height {
                let nidx = mask.index(nx, ny);
                if !visited[nidx] {
                    visited[nidx] = true;
                    queue.push_back((nx, ny));
                }
            }
        }
    }

    if settings.smoothing > 0.0 {
        mask = smooth(&mask, settings.smoothing);
    }

    let stats = FloodFillStats {
        seed_color,
        pixels_visited,
        pixels_selected,
        reached_min_area: pixels_selected >= u64::from(settings.min_area),
        duration_secs: started.elapsed().as_secs_f64(),
    };

    Ok(FloodFillResult { mask, stats })
}

/// Euclidean distance between two RGB colors.
fn color_distance(a: [u8; 3], b: [u8; 3]) -> f32 {
    let dr = f32::from(a[0]) - f32::from(b[0]);
    let dg = f32::from(a[1]) - f32::from(b[1]);
    let db = f32::from(a[2]) - f32::from(b[2]);
    (dr * dr + dg * dg + db * db).sqrt()
}

/// Morphological cleanup of the raw fill: one-pixel erosion to drop
/// stray specks, then a dilation whose radius scales with the
/// smoothing setting (`1 + smoothing / 40`, so the default of 40 grows
/// back by two pixels and reconnects ragged boundaries).
fn smooth(mask: &PixelMask, smoothing: f32) -> PixelMask {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let dilate_radius = 1 + (smoothing.clamp(0.0, 80.0) / 40.0).floor() as u32;
    morphology::dilate(&morphology::erode(mask, 1), dilate_radius)
}
