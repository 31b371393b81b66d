//! Soft circular brush and edge-aware eraser stamps.
//!
//! A stroke is a sequence of stamps, one per reported pointer movement
//! sample. Each stamp is applied directly to the working mask -- there
//! is no separate stroke buffer composited at release, so overlapping
//! samples within one stroke accumulate. The session pushes a single
//! history snapshot when the pointer is released.
//!
//! Stamp falloff: `strength = 1 - distance / radius`, reshaped by
//! hardness (`strength^(1 / hardness_fraction)`, steeper toward a
//! binary disc as hardness rises), then scaled by opacity.
//!
//! The eraser is edge-aware: the local edge strength boosts the stamp
//! (`repel = strength * (1 + edge_strength * hardness_fraction)`) and
//! the sign is inverted relative to the composition mode, so the tool
//! always pushes the selection boundary away -- it removes strength in
//! `Add` mode and restores it in `Subtract` mode.

use crate::edge::EdgeMap;
use crate::mask::PixelMask;
use crate::types::{BrushSettings, BrushTool, Mode};

/// Apply one stamp to a mask, returning the updated mask.
///
/// `(x, y)` is the cursor position in pixel space; the stamp footprint
/// is clipped to the mask, so centers near or beyond the border are
/// safe. Pure take-and-return: the input mask is untouched.
#[must_use = "returns the stamped mask"]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn apply_brush_stamp(
    mask: &PixelMask,
    x: f64,
    y: f64,
    settings: &BrushSettings,
    edge_map: Option<&EdgeMap>,
    mode: Mode,
    tool: BrushTool,
) -> PixelMask {
    let mut out = mask.clone();
    stamp_in_place(&mut out, x, y, settings, edge_map, mode, tool);
    out
}

/// In-place stamp used by the session's per-sample stroke path, where
/// cloning the full mask once per pointer event would be wasted work.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn stamp_in_place(
    mask: &mut PixelMask,
    x: f64,
    y: f64,
    settings: &BrushSettings,
    edge_map: Option<&EdgeMap>,
    mode: Mode,
    tool: BrushTool,
) {
    let radius = f64::from(settings.size.max(1.0)) / 2.0;
    let hardness = f64::from(settings.hardness.clamp(0.0, 100.0)) / 100.0;
    let opacity = f64::from(settings.opacity.clamp(0.0, 100.0)) / 100.0;

    let (width, height) = (i64::from(mask.width()), i64::from(mask.height()));
    let reach = radius.ceil() as i64;

    for dy in -reach..=reach {
        for dx in -reach..=reach {
            #[allow(clippy::cast_precision_loss)]
            let distance = ((dx * dx + dy * dy) as f64).sqrt();
            if distance > radius {
                continue;
            }

            let px = (x + dx as f64).round() as i64;
            let py = (y + dy as f64).round() as i64;
            if px < 0 || px >= width || py < 0 || py >= height {
                continue;
            }
            let (px, py) = (px as u32, py as u32);
            let idx = mask.index(px, py);

            let mut strength = 1.0 - distance / radius;
            if hardness > 0.0 {
                strength = strength.powf(1.0 / hardness);
            }
            strength *= opacity;

            let current = mask.get(px, py);
            let updated = match tool {
                BrushTool::Brush => {
                    let delta = (strength * 255.0).round() as i32;
                    apply_delta(current, delta, mode)
                }
                BrushTool::Eraser => {
                    let edge_strength =
                        edge_map.map_or(0.0, |map| f64::from(map.strength(idx)));
                    let repel = strength * edge_strength.mul_add(hardness, 1.0);
                    let delta = (repel * 255.0).round() as i32;
                    // Inverted: the eraser repels the selection rather
                    // than painting in the mode's direction.
                    apply_delta(current, delta, mode.inverse())
                }
            };
            mask.set(px, py, updated);
        }
    }
}

/// Apply a signed strength delta in the direction of `mode`, clamped
/// to the valid strength range.
fn apply_delta(current: u8, delta: i32, mode: Mode) -> u8 {
    let value = match mode {
        Mode::Add => i32::from(current) + delta,
        Mode::Subtract => i32::from(current) - delta,
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        value.clamp(0, 255) as u8
    }
}

impl Mode {
    /// The opposite composition direction, used by the eraser's
    /// sign inversion.
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Self::Add => Self::Subtract,
            Self::Subtract => Self::Add,
        }
    }
}
