//! Geometry of one redraw, handed to whatever renders the editor.

use egui::{Rect, pos2};

use crate::layout::WaveformLayout;
use crate::selection::Selection;
use crate::viewport::ViewportModel;
use crate::waveform::{ColumnPeak, column_envelope, samples_to_ms};

const TICK_HEIGHT: f32 = 5.0;

/// Labelled mark on the time scale.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeTick {
    pub x: f32,
    pub ms: u64,
    pub label: String,
}

impl TimeTick {
    /// Top and bottom y of the tick mark.
    pub fn mark_span(&self, layout: &WaveformLayout) -> (f32, f32) {
        let top = layout.time_scale.top();
        (top, top + TICK_HEIGHT)
    }
}

/// Everything a renderer needs to draw the editor surface.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveformFrame {
    pub layout: WaveformLayout,
    /// One min/max pair per waveform column, left to right.
    pub peaks: Vec<ColumnPeak>,
    /// Selection overlay clipped to the waveform area; `None` without a selection.
    pub selection: Option<Rect>,
    /// Playhead column; `None` while the cursor sits at sample 0.
    pub playhead_x: Option<f32>,
    /// Thumb marking the visible page on the overview strip.
    pub scroll_thumb: Rect,
    pub overview_selection: Option<Rect>,
    pub ticks: Vec<TimeTick>,
}

impl WaveformFrame {
    pub fn build(
        layout: &WaveformLayout,
        viewport: &ViewportModel,
        samples: &[i16],
        selection: &Selection,
        tick_spacing_px: f32,
    ) -> Self {
        let peaks = column_envelope(
            samples,
            viewport.page_start(),
            viewport.samples_per_pixel(),
            layout.visible_width(),
        );
        let mapped = viewport.samples_per_pixel() > 0;
        let selection_rect = (mapped && !selection.is_empty()).then(|| {
            let (low, high) = selection.bounds();
            let x0 = clip_x(layout, viewport.sample_to_pixel(low));
            let x1 = clip_x(layout, viewport.sample_to_pixel(high));
            Rect::from_min_max(
                pos2(x0, layout.waveform.top()),
                pos2(x1, layout.waveform.bottom()),
            )
        });
        let playhead_x = (mapped && selection.cursor() != 0)
            .then(|| clip_x(layout, viewport.sample_to_pixel(selection.cursor())));
        Self {
            layout: *layout,
            peaks,
            selection: selection_rect,
            playhead_x,
            scroll_thumb: scroll_thumb(layout, viewport),
            overview_selection: overview_selection(layout, viewport, selection),
            ticks: time_ticks(layout, viewport, tick_spacing_px),
        }
    }

    /// Vertical line for `column`: x, then the y of the max and min amplitude.
    pub fn column_line(&self, column: usize) -> Option<(f32, f32, f32)> {
        let &(min, max) = self.peaks.get(column)?;
        let area = self.layout.waveform;
        let center = area.center().y;
        let half = area.height() / 2.0;
        let scale = |value: i16| center - value as f32 / 32_768.0 * half;
        Some((area.left() + column as f32, scale(max), scale(min)))
    }
}

fn clip_x(layout: &WaveformLayout, px: i32) -> f32 {
    (px as f32).clamp(layout.waveform.left(), layout.waveform.right())
}

fn scroll_thumb(layout: &WaveformLayout, viewport: &ViewportModel) -> Rect {
    let (offset, width) = viewport.scroll_thumb_span();
    let strip = layout.overview;
    Rect::from_min_size(
        pos2(strip.left() + offset, strip.top() + 1.0),
        egui::vec2(width, (strip.height() - 2.0).max(0.0)),
    )
}

fn overview_selection(
    layout: &WaveformLayout,
    viewport: &ViewportModel,
    selection: &Selection,
) -> Option<Rect> {
    let width = layout.visible_width();
    if selection.is_empty() || width == 0 {
        return None;
    }
    let per_pixel = viewport.total_samples() / width;
    if per_pixel == 0 {
        return None;
    }
    let (low, high) = selection.bounds();
    let strip = layout.overview;
    let x0 = strip.left() + (low / per_pixel) as f32;
    let x1 = strip.left() + (high / per_pixel) as f32;
    Some(Rect::from_min_max(
        pos2(x0, strip.top() + 1.0),
        pos2(x1, strip.bottom() - 1.0),
    ))
}

fn time_ticks(layout: &WaveformLayout, viewport: &ViewportModel, spacing_px: f32) -> Vec<TimeTick> {
    let width = layout.visible_width();
    if viewport.total_samples() == 0 || spacing_px <= 0.0 {
        return Vec::new();
    }
    let count = (width as f32 / spacing_px) as usize;
    if count < 2 {
        return Vec::new();
    }
    let first_ms = samples_to_ms(viewport.page_start());
    let last_ms = samples_to_ms(viewport.page_start() + viewport.samples_per_page());
    let interval_ms = (last_ms - first_ms) / count as u64;
    let step_px = (width / count) as f32;
    (1..count)
        .map(|i| {
            let ms = first_ms + i as u64 * interval_ms;
            TimeTick {
                x: layout.waveform.left().floor() + i as f32 * step_px,
                ms,
                label: format_tick_label(ms),
            }
        })
        .collect()
}

/// `mm:ss.mmm`, or `hh:mm:ss` from one hour on.
pub fn format_tick_label(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms / 60_000) % 60;
    let secs = (ms / 1_000) % 60;
    if hours > 0 {
        return format!("{hours:02}:{minutes:02}:{secs:02}");
    }
    format!("{minutes:02}:{secs:02}.{:03}", ms % 1_000)
}
