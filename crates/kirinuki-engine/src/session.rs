//! The stateful selection controller: composes candidate masks from
//! the flood fill, rasterizer, brush, and remote adapter into one
//! working mask, with add/subtract modes, bounds tracking, and an
//! undo/redo history of snapshots.
//!
//! The session exclusively owns its working mask. Every mutator either
//! takes and returns masks by value or goes through `&mut self`, so no
//! snapshot in history can ever be retroactively changed by a later
//! operation -- undo/redo is correct by construction.
//!
//! History is a snapshot list plus a cursor (the undo stack is
//! everything before the cursor, the redo stack everything after); a
//! new committed mutation truncates the redo tail. Index 0 is always
//! the empty mask the session started with.

use std::sync::atomic::{AtomicU64, Ordering};

use image::RgbaImage;

use crate::brush;
use crate::edge::EdgeMap;
use crate::extract::{self, Cutout};
use crate::mask::PixelMask;
use crate::types::{Bounds, BrushSettings, BrushTool, Dimensions, EngineError, Mode};

/// Source of distinct session identifiers.
///
/// A remote segmentation response can arrive after the session it was
/// issued for has been cancelled and a new one started; comparing the
/// identifier captured at issue time against the live session's
/// detects that staleness.
static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// An active selection session over one source image.
#[derive(Debug)]
pub struct SelectionSession {
    id: u64,
    working: PixelMask,
    mode: Mode,
    bounds: Option<Bounds>,
    history: Vec<PixelMask>,
    cursor: usize,
}

impl SelectionSession {
    /// Start a new session: all-zero working mask sized to the image,
    /// `Add` mode, history initialized with the empty snapshot.
    #[must_use]
    pub fn start(dimensions: Dimensions) -> Self {
        let working = PixelMask::new(dimensions);
        Self {
            id: NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed),
            history: vec![working.clone()],
            working,
            mode: Mode::Add,
            bounds: None,
            cursor: 0,
        }
    }

    /// Identifier distinguishing this session from any other, live or
    /// destroyed. Capture it before issuing an asynchronous request and
    /// compare before applying the response.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Dimensions the session (and its masks) were created with.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        self.working.dimensions()
    }

    /// The current composition mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Switch between `Add` and `Subtract` composition.
    pub const fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// The working mask.
    #[must_use]
    pub const fn mask(&self) -> &PixelMask {
        &self.working
    }

    /// Bounding box of the current selection, `None` while empty.
    #[must_use]
    pub const fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Number of undoable steps currently behind the cursor.
    #[must_use]
    pub const fn undo_depth(&self) -> usize {
        self.cursor
    }

    /// Combine a candidate mask into the working mask under the
    /// current mode, then snapshot.
    ///
    /// `Add` takes the pointwise maximum (idempotent, strength-
    /// preserving); `Subtract` saturating-subtracts. Atomic: on error
    /// the working mask, bounds, and history are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DimensionMismatch`] when the candidate
    /// was built for a different image size.
    pub fn compose(&mut self, candidate: &PixelMask) -> Result<(), EngineError> {
        if candidate.dimensions() != self.dimensions() {
            return Err(EngineError::DimensionMismatch {
                expected: self.dimensions(),
                actual: candidate.dimensions(),
            });
        }

        let (working, candidate_data) = (self.working.as_mut_slice(), candidate.as_slice());
        match self.mode {
            Mode::Add => {
                for (w, &c) in working.iter_mut().zip(candidate_data) {
                    *w = (*w).max(c);
                }
            }
            Mode::Subtract => {
                for (w, &c) in working.iter_mut().zip(candidate_data) {
                    *w = w.saturating_sub(c);
                }
            }
        }

        self.bounds = self.working.bounds();
        self.push_snapshot();
        Ok(())
    }

    /// Apply one brush/eraser stamp directly to the working mask.
    ///
    /// No history snapshot is taken: stamps within a stroke accumulate
    /// and only the release commit ([`Self::commit_stroke`]) becomes an
    /// undo step. Bounds are refreshed per stamp so selection feedback
    /// tracks the pointer live.
    pub fn stamp(
        &mut self,
        x: f64,
        y: f64,
        settings: &BrushSettings,
        edge_map: Option<&EdgeMap>,
        tool: BrushTool,
    ) {
        brush::stamp_in_place(&mut self.working, x, y, settings, edge_map, self.mode, tool);
        self.bounds = self.working.bounds();
    }

    /// Commit the current stroke: push one history snapshot covering
    /// every stamp since the last commit. A commit with no intervening
    /// change is a no-op (no duplicate snapshot).
    pub fn commit_stroke(&mut self) {
        if self.history[self.cursor] != self.working {
            self.push_snapshot();
        }
    }

    /// Step back one snapshot. No-op when only the initial empty
    /// snapshot remains behind the cursor.
    pub fn undo(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.restore_cursor();
        }
    }

    /// Step forward one snapshot. No-op when there is nothing to redo.
    pub fn redo(&mut self) {
        if self.cursor + 1 < self.history.len() {
            self.cursor += 1;
            self.restore_cursor();
        }
    }

    /// Discard the session entirely. The source image is untouched.
    pub fn cancel(self) {
        drop(self);
    }

    /// Produce the cropped, alpha-matted cutout for the current
    /// selection. The session is left intact; callers drop it (the
    /// `Extracted -> Idle` transition) after a successful extraction.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptySelection`] when nothing is
    /// selected, and [`EngineError::DimensionMismatch`] when `source`
    /// is not the image this session was started for. Both leave the
    /// session untouched and usable.
    pub fn extract(&self, source: &RgbaImage) -> Result<Cutout, EngineError> {
        let bounds = self.bounds.ok_or(EngineError::EmptySelection)?;
        extract::extract(source, &self.working, bounds)
    }

    /// Truncate the redo tail and record the working mask as the newest
    /// snapshot.
    fn push_snapshot(&mut self) {
        self.history.truncate(self.cursor + 1);
        self.history.push(self.working.clone());
        self.cursor += 1;
    }

    /// Reset working mask and bounds from the snapshot at the cursor.
    fn restore_cursor(&mut self) {
        self.working = self.history[self.cursor].clone();
        self.bounds = self.working.bounds();
    }
}
