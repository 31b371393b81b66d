//! Rasterize lasso, rectangle, and ellipse paths into binary masks.
//!
//! All three shapes produce hard 0/255 masks with no anti-aliasing;
//! soft edges, when wanted, are a separate [`crate::morphology::feather`]
//! pass. A pixel is inside a shape when its center `(x + 0.5, y + 0.5)`
//! is inside; the lasso uses the nonzero winding rule, which matches
//! how closed freehand loops self-intersect.
//!
//! Degenerate paths (a lasso with fewer than three points, a zero-area
//! box) rasterize to an all-zero mask rather than an error, so a
//! stray click never aborts a selection gesture.

use serde::{Deserialize, Serialize};

use crate::mask::PixelMask;
use crate::types::{Dimensions, PathPoint};

/// A selection path drawn by the user, in pixel space.
///
/// Transient: exists only for the duration of a draw gesture and is
/// discarded once rasterized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelectionPath {
    /// Freehand polygon; auto-closed from last point back to first.
    Lasso(Vec<PathPoint>),
    /// Axis-aligned box spanned by two corners, order-independent.
    Rectangle(PathPoint, PathPoint),
    /// Ellipse inscribed in the box spanned by two corners.
    Ellipse(PathPoint, PathPoint),
}

/// Rasterize a path into a binary mask of the given dimensions.
#[must_use = "returns the rasterized mask"]
pub fn rasterize(path: &SelectionPath, dimensions: Dimensions) -> PixelMask {
    match path {
        SelectionPath::Lasso(points) => rasterize_lasso(points, dimensions),
        SelectionPath::Rectangle(a, b) => rasterize_rectangle(*a, *b, dimensions),
        SelectionPath::Ellipse(a, b) => rasterize_ellipse(*a, *b, dimensions),
    }
}

/// Scan-fill a polygon under the nonzero winding rule.
///
/// Per scanline, every non-horizontal edge crossing the pixel-center
/// row contributes an x intercept and a direction (+1 downward, -1
/// upward). Walking the sorted intercepts keeps a running winding
/// count; spans where it is nonzero are filled. The half-open span
/// test (`y_min <= yc < y_max`) counts shared vertices exactly once.
fn rasterize_lasso(points: &[PathPoint], dimensions: Dimensions) -> PixelMask {
    let mut mask = PixelMask::new(dimensions);
    if points.len() < 3 {
        return mask;
    }

    for y in 0..dimensions.height {
        let yc = f64::from(y) + 0.5;

        // Gather intercepts of the scanline with all edges.
        let mut crossings: Vec<(f64, i32)> = Vec::new();
        for (i, &p) in points.iter().enumerate() {
            let q = points[(i + 1) % points.len()]; // auto-close
            if (p.y - q.y).abs() < f64::EPSILON {
                continue; // horizontal edge, no crossing
            }
            let (y_min, y_max, direction) = if q.y > p.y {
                (p.y, q.y, 1)
            } else {
                (q.y, p.y, -1)
            };
            if yc >= y_min && yc < y_max {
                let t = (yc - p.y) / (q.y - p.y);
                crossings.push((t.mul_add(q.x - p.x, p.x), direction));
            }
        }
        crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

        // Fill spans with nonzero winding.
        let mut winding = 0_i32;
        let mut span_start = 0.0_f64;
        for (cx, direction) in crossings {
            if winding != 0 {
                fill_span(&mut mask, y, span_start, cx);
            }
            winding += direction;
            span_start = cx;
        }
    }
    mask
}

/// Fill pixels of row `y` whose centers lie in `[x_start, x_end)`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn fill_span(mask: &mut PixelMask, y: u32, x_start: f64, x_end: f64) {
    let width = f64::from(mask.width());
    // First pixel whose center (x + 0.5) >= x_start, last before x_end.
    let first = (x_start - 0.5).ceil().clamp(0.0, width) as u32;
    for x in first..mask.width() {
        if f64::from(x) + 0.5 >= x_end {
            break;
        }
        mask.set(x, y, 255);
    }
}

/// Fill the axis-aligned box spanned by two corners.
fn rasterize_rectangle(a: PathPoint, b: PathPoint, dimensions: Dimensions) -> PixelMask {
    let mut mask = PixelMask::new(dimensions);
    let (min_x, max_x) = (a.x.min(b.x), a.x.max(b.x));
    let (min_y, max_y) = (a.y.min(b.y), a.y.max(b.y));
    if max_x - min_x <= 0.0 || max_y - min_y <= 0.0 {
        return mask;
    }

    for y in 0..dimensions.height {
        let yc = f64::from(y) + 0.5;
        if yc < min_y || yc >= max_y {
            continue;
        }
        fill_span(&mut mask, y, min_x, max_x);
    }
    mask
}

/// Fill the ellipse inscribed in the box spanned by two corners:
/// center at the box midpoint, radii equal to the half-extents.
fn rasterize_ellipse(a: PathPoint, b: PathPoint, dimensions: Dimensions) -> PixelMask {
    let mut mask = PixelMask::new(dimensions);
    let center_x = f64::midpoint(a.x, b.x);
    let center_y = f64::midpoint(a.y, b.y);
    let radius_x = (b.x - a.x).abs() / 2.0;
    let radius_y = (b.y - a.y).abs() / 2.0;
    if radius_x <= 0.0 || radius_y <= 0.0 {
        return mask;
    }

    for y in 0..dimensions.height {
        let dy = (f64::from(y) + 0.5 - center_y) / radius_y;
        if dy.abs() > 1.0 {
            continue;
        }
        for x in 0..dimensions.width {
            let dx = (f64::from(x) + 0.5 - center_x) / radius_x;
            if dx.mul_add(dx, dy * dy) <= 1.0 {
                mask.set(x, y, 255);
            }
        }
    }
    mask
}
