//! Mapping between sample indices and pixel columns under zoom and horizontal pan.
//!
//! All arithmetic is floored integer math: `samples_per_pixel = total / (width * zoom)` and
//! `samples_per_page = total / zoom`. Converting a pixel to a sample and back is exact inside the
//! drawn area, but converting a sample to a pixel and back loses up to `samples_per_pixel - 1`
//! samples. That loss is part of the contract and is never corrected after the fact.
//!
//! Zoom is capped so the zoomed width never exceeds the buffer length, keeping at least one
//! sample per column. A buffer shorter than the visible width at zoom 1 fills only its first
//! `total_samples` columns; the round trip holds on those columns and the rest clamp to the end.

use tracing::debug;

/// Smallest zoom factor (whole buffer on one page).
pub const MIN_ZOOM: u32 = 1;
/// Largest zoom factor.
pub const MAX_ZOOM: u32 = 32;
/// Zoom factors offered to a zoom selector, in order.
pub const ZOOM_LEVELS: [u32; 6] = [1, 2, 4, 8, 16, 32];

/// Clamp `factor` into `[MIN_ZOOM, MAX_ZOOM]` and round it down to a power of two.
pub fn clamp_zoom(factor: u32) -> u32 {
    let clamped = factor.clamp(MIN_ZOOM, MAX_ZOOM);
    1 << (u32::BITS - 1 - clamped.leading_zeros())
}

/// Position of `zoom` in [`ZOOM_LEVELS`], if it is one of them.
pub fn zoom_level_index(zoom: u32) -> Option<usize> {
    ZOOM_LEVELS.iter().position(|&level| level == zoom)
}

/// Pan and zoom state of the center waveform area.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewportModel {
    total_samples: usize,
    visible_width: usize,
    left_margin: i32,
    zoom: u32,
    page_start: usize,
    samples_per_pixel: usize,
    samples_per_page: usize,
}

impl Default for ViewportModel {
    fn default() -> Self {
        Self::new(0)
    }
}

impl ViewportModel {
    /// Create an unconfigured viewport whose first column sits at `left_margin`.
    pub fn new(left_margin: i32) -> Self {
        Self {
            total_samples: 0,
            visible_width: 0,
            left_margin,
            zoom: MIN_ZOOM,
            page_start: 0,
            samples_per_pixel: 0,
            samples_per_page: 0,
        }
    }

    /// Re-derive the mapping for a new buffer length or visible width, keeping zoom and pan.
    pub fn configure(&mut self, total_samples: usize, visible_width_px: usize) {
        self.total_samples = total_samples;
        self.visible_width = visible_width_px;
        self.zoom = self.zoom.min(self.max_zoom());
        self.derive();
        self.page_start = self.clamped_page_start(self.page_start);
    }

    /// Move the first drawn column, e.g. after the layout changed.
    pub fn set_left_margin(&mut self, left_margin: i32) {
        self.left_margin = left_margin;
    }

    /// Apply a new zoom factor and recenter on the midpoint of `focus`.
    ///
    /// The factor is clamped to a power of two no larger than [`ViewportModel::max_zoom`].
    /// `focus` is a sample range in either order, normally the current selection. The page is
    /// chosen so the midpoint lands on the center column, then clamped into the valid range.
    /// Returns the zoom actually applied.
    pub fn set_zoom(&mut self, factor: u32, focus: (usize, usize)) -> u32 {
        let zoom = clamp_zoom(factor).min(self.max_zoom());
        let old_zoom = self.zoom;
        let center_px = self.visible_width / 2;
        let old_center = center_px * self.samples_per_pixel + self.page_start;
        self.zoom = zoom;
        self.derive();
        if self.samples_per_pixel == 0 {
            self.page_start = 0;
            return zoom;
        }
        let (start, end) = ordered(focus);
        let midpoint = start + (end - start) / 2;
        let target = midpoint.saturating_sub(center_px * self.samples_per_pixel);
        self.page_start = self.clamped_page_start(target);
        debug!(
            "Zoom {old_zoom}x -> {zoom}x; center sample {old_center} -> {midpoint}, page start {}",
            self.page_start
        );
        zoom
    }

    /// Move the page to start at `page_start`; returns true when the page moved.
    ///
    /// Panning is disabled at zoom 1.
    pub fn pan_to(&mut self, page_start: usize) -> bool {
        if !self.is_zoomed() {
            return false;
        }
        let next = self.clamped_page_start(page_start);
        let changed = next != self.page_start;
        self.page_start = next;
        changed
    }

    /// Pan by a horizontal drag of `delta_px` on the overview strip.
    ///
    /// The strip spans the whole buffer over the visible width, so the thumb position maps
    /// proportionally back to a page start.
    pub fn pan_by_drag(&mut self, delta_px: f32) -> bool {
        if !self.is_zoomed() || self.total_samples == 0 || self.visible_width == 0 {
            return false;
        }
        let (thumb_offset, _) = self.scroll_thumb_span();
        let scroll_x = thumb_offset as f64 + delta_px as f64;
        let target = self.total_samples as f64 * (scroll_x / self.visible_width as f64);
        let target = if target.is_finite() && target > 0.0 {
            target as usize
        } else {
            0
        };
        self.pan_to(target)
    }

    /// Advance one page when the live cursor runs off the right edge; returns true on a page turn.
    pub fn follow_cursor(&mut self, sample: usize) -> bool {
        if self.samples_per_pixel == 0 || sample < self.page_start {
            return false;
        }
        let column = (sample - self.page_start) / self.samples_per_pixel;
        if column < self.visible_width {
            return false;
        }
        let next = self.clamped_page_start(self.page_start + self.samples_per_page);
        let changed = next != self.page_start;
        self.page_start = next;
        changed
    }

    /// Reset the page to the start of the buffer regardless of zoom.
    pub fn rewind(&mut self) {
        self.page_start = 0;
    }

    /// Pixel x coordinate of `sample`, floored; samples left of the page map left of the area.
    pub fn sample_to_pixel(&self, sample: usize) -> i32 {
        if self.samples_per_pixel == 0 {
            return self.left_margin;
        }
        let offset = sample as i64 - self.page_start as i64;
        let column = offset.div_euclid(self.samples_per_pixel as i64);
        (self.left_margin as i64 + column).clamp(i32::MIN as i64, i32::MAX as i64) as i32
    }

    /// Sample index under pixel x coordinate `px`, clamped into `[0, total_samples]`.
    ///
    /// Pixels left of the area map to the page start.
    pub fn pixel_to_sample(&self, px: i32) -> usize {
        let column = px.saturating_sub(self.left_margin).max(0) as usize;
        column
            .saturating_mul(self.samples_per_pixel)
            .saturating_add(self.page_start)
            .min(self.total_samples)
    }

    /// Offset and width in pixels of the overview thumb marking the visible page.
    pub fn scroll_thumb_span(&self) -> (f32, f32) {
        if self.total_samples == 0 {
            return (0.0, self.visible_width as f32);
        }
        let offset = (self.visible_width as f64 * self.page_start as f64
            / self.total_samples as f64)
            .floor();
        let width = self.visible_width / self.zoom as usize;
        (offset as f32, width as f32)
    }

    pub fn total_samples(&self) -> usize {
        self.total_samples
    }

    pub fn visible_width(&self) -> usize {
        self.visible_width
    }

    pub fn left_margin(&self) -> i32 {
        self.left_margin
    }

    pub fn zoom(&self) -> u32 {
        self.zoom
    }

    pub fn is_zoomed(&self) -> bool {
        self.zoom > MIN_ZOOM
    }

    /// Leftmost visible sample.
    pub fn page_start(&self) -> usize {
        self.page_start
    }

    pub fn samples_per_pixel(&self) -> usize {
        self.samples_per_pixel
    }

    pub fn samples_per_page(&self) -> usize {
        self.samples_per_page
    }

    /// Largest zoom at which every drawn column still covers at least one sample.
    pub fn max_zoom(&self) -> u32 {
        if self.total_samples == 0 || self.visible_width == 0 {
            return MAX_ZOOM;
        }
        let fit = (self.total_samples / self.visible_width).clamp(1, MAX_ZOOM as usize);
        clamp_zoom(fit as u32)
    }

    /// Largest valid page start for the current zoom.
    pub fn max_page_start(&self) -> usize {
        self.total_samples.saturating_sub(self.samples_per_page)
    }

    fn derive(&mut self) {
        let columns = self.visible_width.saturating_mul(self.zoom as usize);
        if self.total_samples == 0 || columns == 0 {
            self.samples_per_pixel = 0;
            self.samples_per_page = 0;
            return;
        }
        // Buffers shorter than the zoomed width still advance one sample per column.
        self.samples_per_pixel = (self.total_samples / columns).max(1);
        self.samples_per_page = self.total_samples / self.zoom as usize;
    }

    fn clamped_page_start(&self, page_start: usize) -> usize {
        if !self.is_zoomed() {
            return 0;
        }
        page_start.min(self.max_page_start())
    }
}

fn ordered((a, b): (usize, usize)) -> (usize, usize) {
    if a <= b { (a, b) } else { (b, a) }
}
