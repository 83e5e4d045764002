//! Sample-space selection and the pointer state machine that drives it.
//! Selection math stays pure here; the session only forwards pointer events.

use egui::Pos2;
use tracing::trace;

use crate::layout::{LayoutRegion, WaveformLayout};
use crate::viewport::ViewportModel;

/// Selected sample range plus the playhead.
///
/// `start` and `end` are stored in the order they were set; [`Selection::bounds`] orders them.
/// `start == end` means no selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    start: usize,
    end: usize,
    cursor: usize,
}

impl Selection {
    pub fn new(start: usize, end: usize, cursor: usize) -> Self {
        Self { start, end, cursor }
    }

    /// Empty selection with the cursor at `at`.
    pub fn collapsed(at: usize) -> Self {
        Self::new(at, at, at)
    }

    /// Ordered `(low, high)` bounds of the half-open range.
    pub fn bounds(&self) -> (usize, usize) {
        if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Playhead and paste insertion point.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of selected samples.
    pub fn len(&self) -> usize {
        let (low, high) = self.bounds();
        high - low
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Replace the range, keeping the cursor.
    pub fn set_range(&mut self, a: usize, b: usize) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        self.start = low;
        self.end = high;
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor;
    }

    /// Copy with every index clamped into `[0, total]`.
    pub fn clamped(self, total: usize) -> Self {
        Self::new(
            self.start.min(total),
            self.end.min(total),
            self.cursor.min(total),
        )
    }
}

/// Coarse interaction state, as seen by callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerState {
    Idle,
    Selecting,
    Panning,
}

/// What a pointer event changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerOutcome {
    Ignored,
    /// The selection or cursor moved.
    Selection,
    /// The viewport panned.
    View,
}

impl PointerOutcome {
    /// True when the event requires a redraw.
    pub fn needs_redraw(self) -> bool {
        !matches!(self, PointerOutcome::Ignored)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Gesture {
    Selecting { anchor: usize },
    Panning { last_x: f32 },
}

/// Tracks the active pointer gesture.
///
/// A gesture starting on the waveform area selects; one starting on the overview strip pans.
/// The target is fixed for the whole gesture.
#[derive(Clone, Debug, Default)]
pub struct SelectionController {
    gesture: Option<Gesture>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PointerState {
        match self.gesture {
            None => PointerState::Idle,
            Some(Gesture::Selecting { .. }) => PointerState::Selecting,
            Some(Gesture::Panning { .. }) => PointerState::Panning,
        }
    }

    /// Begin a gesture at `pos`.
    pub fn press(
        &mut self,
        pos: Pos2,
        layout: &WaveformLayout,
        viewport: &ViewportModel,
        selection: &mut Selection,
    ) -> PointerOutcome {
        if viewport.total_samples() == 0 {
            return PointerOutcome::Ignored;
        }
        match layout.hit(pos) {
            Some(LayoutRegion::Waveform) => {
                let anchor = viewport.pixel_to_sample(layout.column_at(pos.x));
                *selection = Selection::collapsed(anchor);
                self.gesture = Some(Gesture::Selecting { anchor });
                trace!("Selection anchored at sample {anchor}");
                PointerOutcome::Selection
            }
            Some(LayoutRegion::Overview) => {
                self.gesture = Some(Gesture::Panning { last_x: pos.x });
                trace!("Overview pan started at x={}", pos.x);
                PointerOutcome::Ignored
            }
            Some(LayoutRegion::TimeScale) | None => PointerOutcome::Ignored,
        }
    }

    /// Continue the active gesture.
    pub fn drag(
        &mut self,
        pos: Pos2,
        layout: &WaveformLayout,
        viewport: &mut ViewportModel,
        selection: &mut Selection,
    ) -> PointerOutcome {
        match self.gesture {
            None => PointerOutcome::Ignored,
            Some(Gesture::Selecting { anchor }) => {
                let far = viewport.pixel_to_sample(layout.column_at(pos.x));
                let before = *selection;
                selection.set_range(anchor, far);
                if *selection == before {
                    PointerOutcome::Ignored
                } else {
                    PointerOutcome::Selection
                }
            }
            Some(Gesture::Panning { last_x }) => {
                self.gesture = Some(Gesture::Panning { last_x: pos.x });
                if viewport.pan_by_drag(pos.x - last_x) {
                    PointerOutcome::View
                } else {
                    PointerOutcome::Ignored
                }
            }
        }
    }

    /// Finish the gesture like a final drag, then return to idle.
    pub fn release(
        &mut self,
        pos: Pos2,
        layout: &WaveformLayout,
        viewport: &mut ViewportModel,
        selection: &mut Selection,
    ) -> PointerOutcome {
        let outcome = self.drag(pos, layout, viewport, selection);
        if let Some(Gesture::Selecting { .. }) = self.gesture {
            let (start, end) = selection.bounds();
            trace!("Selection finished at [{start}, {end})");
        }
        self.gesture = None;
        outcome
    }

    /// Drop any active gesture without applying it.
    pub fn cancel(&mut self) {
        self.gesture = None;
    }

    /// Wheel up doubles the zoom, wheel down halves it, recentering on the selection.
    ///
    /// Returns the zoom applied, or `None` when the event was ignored.
    pub fn wheel(
        &mut self,
        delta: f32,
        viewport: &mut ViewportModel,
        selection: &Selection,
    ) -> Option<u32> {
        if viewport.total_samples() == 0 || delta == 0.0 || !delta.is_finite() {
            return None;
        }
        let zoom = viewport.zoom();
        let next = if delta > 0.0 { zoom * 2 } else { zoom / 2 };
        Some(viewport.set_zoom(next, selection.bounds()))
    }
}
