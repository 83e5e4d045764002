//! One open document and everything needed to view and edit it.
//!
//! [`EditorSession`] owns the buffer, selection, viewport, and history and is mutated only
//! through its methods. Pointer, playback, and command input from other contexts goes through
//! [`SessionDispatcher`], which applies it in arrival order on the owning thread.

mod dispatch;
mod error;
mod frame;
mod temp_area;

pub use dispatch::{
    CommandOutcome, CommandResult, DispatchReport, SessionCommand, SessionDispatcher, SessionEvent,
};
pub use error::SessionError;
pub use frame::{TimeTick, WaveformFrame, format_tick_label};
pub use temp_area::{TempArea, TempAreaError};

use std::{
    fs,
    path::{Path, PathBuf},
};

use egui::{Pos2, Vec2, vec2};
use tracing::{debug, info, warn};

use crate::clipboard::{ClipboardBridge, MemoryClipboard};
use crate::config::EditorSettings;
use crate::edit::{self, EditKind, EditResult};
use crate::history::{EditHistory, HistoryStep};
use crate::layout::WaveformLayout;
use crate::selection::{PointerOutcome, Selection, SelectionController};
use crate::transcode::{FfmpegTranscoder, TranscodeError, Transcoder};
use crate::viewport::ViewportModel;
use crate::waveform::{SampleBuffer, ms_to_samples, read_canonical, write_canonical};

/// Surface size used until the host reports one.
pub const DEFAULT_SURFACE_SIZE: Vec2 = vec2(830.0, 300.0);

const OPEN_LABEL: &str = "open";

/// Outcome of a successful [`EditorSession::open`].
#[derive(Debug)]
pub struct OpenReport {
    pub samples: usize,
    pub duration_ms: u64,
    /// Version of the document inside the temp area.
    pub working_copy: PathBuf,
    /// Set when conversion failed and the input was loaded as-is.
    pub transcode_warning: Option<TranscodeError>,
}

/// Informational result of an edit or history request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditStatus {
    Applied(EditKind),
    Copied { samples: usize },
    /// Undo or redo moved to this history index.
    HistoryMoved(usize),
    AtHistoryStart,
    AtHistoryEnd,
}

#[derive(Debug)]
struct Document {
    source: PathBuf,
    name: String,
    temp: TempArea,
}

/// Editor state for at most one open document.
pub struct EditorSession {
    settings: EditorSettings,
    document: Option<Document>,
    buffer: SampleBuffer,
    selection: Selection,
    controller: SelectionController,
    viewport: ViewportModel,
    history: EditHistory,
    layout: WaveformLayout,
    clipboard: Box<dyn ClipboardBridge + Send>,
    transcoder: Box<dyn Transcoder + Send>,
}

impl EditorSession {
    /// Session with an in-process clipboard and the configured external transcoder.
    pub fn new(settings: EditorSettings) -> Self {
        let transcoder = FfmpegTranscoder::from_settings(&settings.transcoder);
        Self::with_collaborators(settings, Box::new(MemoryClipboard::new()), Box::new(transcoder))
    }

    pub fn with_collaborators(
        settings: EditorSettings,
        clipboard: Box<dyn ClipboardBridge + Send>,
        transcoder: Box<dyn Transcoder + Send>,
    ) -> Self {
        let layout = WaveformLayout::new(DEFAULT_SURFACE_SIZE, &settings.layout);
        let mut viewport = ViewportModel::new(layout.left_margin());
        viewport.configure(0, layout.visible_width());
        Self {
            history: EditHistory::new(settings.history_capacity),
            settings,
            document: None,
            buffer: SampleBuffer::default(),
            selection: Selection::default(),
            controller: SelectionController::new(),
            viewport,
            layout,
            clipboard,
            transcoder,
        }
    }

    /// Load `path`, converting it to the canonical format when possible.
    ///
    /// Any open document is closed first. When conversion fails the input is loaded as-is and
    /// the failure is reported in [`OpenReport::transcode_warning`].
    pub fn open(&mut self, path: &Path) -> Result<OpenReport, SessionError> {
        self.close();
        let temp = TempArea::create(&self.settings.temp_root())?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "untitled".to_string());

        let converted = temp.version_path(&name)?;
        let (working_copy, transcode_warning) =
            match self.transcoder.transcode(path, &converted) {
                Ok(()) => (converted, None),
                Err(err) => {
                    warn!(
                        "Transcoding {} failed, loading it unconverted: {err}",
                        path.display()
                    );
                    (temp.import(&name, path)?, Some(err))
                }
            };
        let buffer = read_canonical(&working_copy)?;

        self.history.push(OPEN_LABEL, buffer.clone(), Some(working_copy.clone()));
        self.viewport = ViewportModel::new(self.layout.left_margin());
        self.viewport
            .configure(buffer.len(), self.layout.visible_width());
        self.selection = Selection::default();
        self.controller.cancel();
        let report = OpenReport {
            samples: buffer.len(),
            duration_ms: buffer.duration_ms(),
            working_copy,
            transcode_warning,
        };
        self.buffer = buffer;
        self.document = Some(Document {
            source: path.to_path_buf(),
            name,
            temp,
        });
        info!(
            "Opened {} ({} samples, {} ms)",
            path.display(),
            report.samples,
            report.duration_ms
        );
        Ok(report)
    }

    /// Write the current version to `path`.
    pub fn save(&self, path: &Path) -> Result<(), SessionError> {
        if self.document.is_none() {
            return Err(SessionError::NoDocument);
        }
        match self.history.current().and_then(|entry| entry.path()) {
            Some(current) => {
                fs::copy(current, path).map_err(|source| SessionError::Save {
                    path: path.to_path_buf(),
                    source,
                })?;
            }
            None => write_canonical(path, &self.buffer)?,
        }
        info!("Saved {} samples to {}", self.buffer.len(), path.display());
        Ok(())
    }

    /// Drop the document, its history, and its temp area.
    pub fn close(&mut self) {
        let Some(document) = self.document.take() else {
            return;
        };
        self.history.clear();
        self.buffer = SampleBuffer::default();
        self.selection = Selection::default();
        self.controller.cancel();
        self.viewport.configure(0, self.layout.visible_width());
        self.viewport.rewind();
        info!("Closed {}", document.source.display());
    }

    pub fn cut(&mut self) -> Result<EditStatus, SessionError> {
        self.require_document()?;
        let result = edit::cut(&self.buffer, &self.selection, self.clipboard.as_mut())?;
        self.commit(result)
    }

    pub fn copy(&mut self) -> Result<EditStatus, SessionError> {
        self.require_document()?;
        let samples = edit::copy(&self.buffer, &self.selection, self.clipboard.as_mut())?;
        Ok(EditStatus::Copied { samples })
    }

    pub fn paste(&mut self) -> Result<EditStatus, SessionError> {
        self.require_document()?;
        let result = edit::paste(&self.buffer, &self.selection, self.clipboard.as_ref())?;
        self.commit(result)
    }

    pub fn delete_segment(&mut self) -> Result<EditStatus, SessionError> {
        self.require_document()?;
        let result = edit::delete_segment(&self.buffer, &self.selection)?;
        self.commit(result)
    }

    pub fn mute_segment(&mut self) -> Result<EditStatus, SessionError> {
        self.require_document()?;
        let result = edit::mute_segment(&self.buffer, &self.selection)?;
        self.commit(result)
    }

    pub fn undo(&mut self) -> Result<EditStatus, SessionError> {
        self.require_document()?;
        let step = self.history.undo();
        Ok(self.after_history_step(step))
    }

    pub fn redo(&mut self) -> Result<EditStatus, SessionError> {
        self.require_document()?;
        let step = self.history.redo();
        Ok(self.after_history_step(step))
    }

    /// Apply a zoom factor around the selection midpoint; returns the zoom in effect.
    pub fn set_zoom(&mut self, factor: u32) -> u32 {
        self.viewport.set_zoom(factor, self.selection.bounds())
    }

    /// Move the playhead to `ms`, turning the page when it runs off the right edge.
    ///
    /// Returns true when the view changed. Seeking to 0 rewinds the page.
    pub fn seek(&mut self, ms: f64) -> bool {
        let cursor = ms_to_samples(ms).min(self.buffer.len());
        let moved = cursor != self.selection.cursor();
        self.selection.set_cursor(cursor);
        if cursor == 0 {
            let paged = self.viewport.page_start() != 0;
            self.viewport.rewind();
            return moved || paged;
        }
        self.viewport.follow_cursor(cursor) || moved
    }

    /// Playback ended: the playhead returns to the start.
    pub fn playback_stopped(&mut self) -> bool {
        self.seek(0.0)
    }

    /// Select `[start, end)` in either order, clamped to the buffer; the cursor goes to the start.
    pub fn select_samples(&mut self, start: usize, end: usize) -> Selection {
        let total = self.buffer.len();
        let (start, end) = (start.min(total), end.min(total));
        let mut selection = Selection::collapsed(start.min(end));
        selection.set_range(start, end);
        self.selection = selection;
        self.controller.cancel();
        selection
    }

    pub fn pointer_pressed(&mut self, pos: Pos2) -> PointerOutcome {
        self.controller
            .press(pos, &self.layout, &self.viewport, &mut self.selection)
    }

    pub fn pointer_moved(&mut self, pos: Pos2) -> PointerOutcome {
        self.controller
            .drag(pos, &self.layout, &mut self.viewport, &mut self.selection)
    }

    pub fn pointer_released(&mut self, pos: Pos2) -> PointerOutcome {
        self.controller
            .release(pos, &self.layout, &mut self.viewport, &mut self.selection)
    }

    /// Wheel zoom; returns the zoom in effect when the event was applied.
    pub fn wheel(&mut self, delta: f32) -> Option<u32> {
        self.controller
            .wheel(delta, &mut self.viewport, &self.selection)
    }

    /// Re-layout for a new surface size.
    pub fn resize(&mut self, size: Vec2) {
        self.layout = WaveformLayout::new(size, &self.settings.layout);
        self.viewport.set_left_margin(self.layout.left_margin());
        self.viewport
            .configure(self.buffer.len(), self.layout.visible_width());
        debug!(
            "Resized to {}x{}; {} columns",
            size.x,
            size.y,
            self.layout.visible_width()
        );
    }

    /// Draw model for the current state.
    pub fn frame(&self) -> WaveformFrame {
        WaveformFrame::build(
            &self.layout,
            &self.viewport,
            self.buffer.samples(),
            &self.selection,
            self.settings.layout.tick_spacing_px,
        )
    }

    pub fn is_open(&self) -> bool {
        self.document.is_some()
    }

    pub fn buffer(&self) -> &SampleBuffer {
        &self.buffer
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn controller(&self) -> &SelectionController {
        &self.controller
    }

    pub fn viewport(&self) -> &ViewportModel {
        &self.viewport
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    pub fn layout(&self) -> &WaveformLayout {
        &self.layout
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn clipboard(&self) -> &dyn ClipboardBridge {
        self.clipboard.as_ref()
    }

    /// Path the open document was loaded from.
    pub fn source_path(&self) -> Option<&Path> {
        self.document.as_ref().map(|doc| doc.source.as_path())
    }

    /// Temp area directory of the open document.
    pub fn temp_dir(&self) -> Option<&Path> {
        self.document.as_ref().map(|doc| doc.temp.path())
    }

    /// Materialized file of the current version.
    pub fn working_copy(&self) -> Option<&Path> {
        self.history.current().and_then(|entry| entry.path())
    }

    fn require_document(&self) -> Result<&Document, SessionError> {
        self.document.as_ref().ok_or(SessionError::NoDocument)
    }

    /// Materialize and register an edit result, then make it current.
    fn commit(&mut self, result: EditResult) -> Result<EditStatus, SessionError> {
        let document = self.require_document()?;
        let path = document.temp.materialize(&document.name, &result.buffer)?;
        let EditResult {
            buffer,
            edit_point,
            kind,
        } = result;
        self.history.push(kind.label(), buffer.clone(), Some(path));
        self.buffer = buffer;
        self.viewport
            .configure(self.buffer.len(), self.layout.visible_width());
        self.selection = Selection::collapsed(edit_point.min(self.buffer.len()));
        Ok(EditStatus::Applied(kind))
    }

    fn after_history_step(&mut self, step: HistoryStep) -> EditStatus {
        match step {
            HistoryStep::Moved(index) => {
                if let Some(entry) = self.history.current() {
                    self.buffer = entry.buffer().clone();
                }
                self.viewport
                    .configure(self.buffer.len(), self.layout.visible_width());
                let cursor = self.selection.cursor().min(self.buffer.len());
                self.selection = Selection::collapsed(cursor);
                info!("History moved to version {index} ({} samples)", self.buffer.len());
                EditStatus::HistoryMoved(index)
            }
            HistoryStep::AtStart => {
                info!("Nothing to undo");
                EditStatus::AtHistoryStart
            }
            HistoryStep::AtEnd => {
                info!("Nothing to redo");
                EditStatus::AtHistoryEnd
            }
        }
    }
}

impl Drop for EditorSession {
    fn drop(&mut self) {
        self.close();
    }
}
