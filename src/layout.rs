//! Screen-space regions of the editor surface.
//!
//! The surface is split top to bottom into the overview strip (which doubles as the scroll bar),
//! the center waveform area, and the time scale. Pointer positions are hit-tested against these
//! regions; only the waveform area participates in sample/pixel mapping.

use egui::{Pos2, Rect, Vec2, pos2, vec2};

use crate::config::LayoutSettings;

/// Vertical gap between the overview strip and the waveform area.
const WAVEFORM_GAP: f32 = 5.0;

/// Region of the surface under a pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutRegion {
    Overview,
    Waveform,
    TimeScale,
}

/// Rectangles of the editor surface for one window size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveformLayout {
    pub overview: Rect,
    pub waveform: Rect,
    pub time_scale: Rect,
}

impl WaveformLayout {
    /// Lay out a surface of `size` logical pixels.
    pub fn new(size: Vec2, settings: &LayoutSettings) -> Self {
        let inner_width = (size.x - 2.0 * settings.margin_x).max(0.0);
        let overview = Rect::from_min_size(
            pos2(settings.margin_x, settings.margin_y),
            vec2(inner_width, settings.overview_height),
        );
        let waveform_height = (size.y
            - 2.0 * settings.margin_y
            - settings.overview_height
            - WAVEFORM_GAP
            - settings.time_scale_height)
            .max(0.0);
        let waveform = Rect::from_min_size(
            pos2(settings.margin_x, overview.bottom() + WAVEFORM_GAP),
            vec2(inner_width, waveform_height),
        );
        let time_scale = Rect::from_min_size(
            pos2(settings.margin_x, waveform.bottom()),
            vec2(inner_width, settings.time_scale_height),
        );
        Self {
            overview,
            waveform,
            time_scale,
        }
    }

    /// Number of whole pixel columns in the waveform area.
    pub fn visible_width(&self) -> usize {
        self.waveform.width().floor().max(0.0) as usize
    }

    /// Pixel x coordinate of the first waveform column.
    pub fn left_margin(&self) -> i32 {
        self.waveform.left().floor() as i32
    }

    /// Region containing `pos`, preferring the waveform area.
    pub fn hit(&self, pos: Pos2) -> Option<LayoutRegion> {
        if self.waveform.contains(pos) {
            Some(LayoutRegion::Waveform)
        } else if self.overview.contains(pos) {
            Some(LayoutRegion::Overview)
        } else if self.time_scale.contains(pos) {
            Some(LayoutRegion::TimeScale)
        } else {
            None
        }
    }

    /// Pixel column under `x`, truncated and clamped onto a drawn waveform column.
    pub fn column_at(&self, x: f32) -> i32 {
        let left = self.left_margin();
        let last = left + self.visible_width().saturating_sub(1) as i32;
        if !x.is_finite() {
            return left;
        }
        (x.floor() as i32).clamp(left, last.max(left))
    }
}
