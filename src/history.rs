//! Bounded linear undo/redo history of buffer versions.
//!
//! Entries form a sliding window: indices are contiguous from 0, a push drops every entry
//! after the cursor, and pushing past capacity evicts the oldest entry. Evicted or discarded
//! entries delete the temp file they were materialized to.

use std::{
    collections::VecDeque,
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::waveform::SampleBuffer;

/// One retained buffer version.
#[derive(Debug)]
pub struct HistoryEntry {
    label: String,
    buffer: SampleBuffer,
    file: Option<VersionFile>,
}

impl HistoryEntry {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn buffer(&self) -> &SampleBuffer {
        &self.buffer
    }

    /// Where this version was materialized, if it was.
    pub fn path(&self) -> Option<&Path> {
        self.file.as_ref().map(|file| file.path.as_path())
    }
}

/// Result of an undo or redo request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryStep {
    /// The cursor moved to this index.
    Moved(usize),
    AtStart,
    AtEnd,
}

/// Linear history with a cursor on the active version.
#[derive(Debug)]
pub struct EditHistory {
    entries: VecDeque<HistoryEntry>,
    cursor: usize,
    capacity: usize,
}

impl EditHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: 0,
            capacity: capacity.max(1),
        }
    }

    /// Register `buffer` as the newest version, discarding any redo entries.
    ///
    /// `path` is the materialized copy of the buffer; it is deleted when the entry is dropped.
    pub fn push(&mut self, label: impl Into<String>, buffer: SampleBuffer, path: Option<PathBuf>) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        let label = label.into();
        debug!("History push '{label}' ({} samples)", buffer.len());
        self.entries.push_back(HistoryEntry {
            label,
            buffer,
            file: path.map(|path| VersionFile { path }),
        });
        while self.entries.len() > self.capacity {
            if let Some(evicted) = self.entries.pop_front() {
                debug!("History evicted '{}'", evicted.label);
            }
        }
        self.cursor = self.entries.len() - 1;
    }

    /// Step back one version.
    pub fn undo(&mut self) -> HistoryStep {
        if self.entries.is_empty() || self.cursor == 0 {
            return HistoryStep::AtStart;
        }
        self.cursor -= 1;
        debug!("Undo to version {}", self.cursor);
        HistoryStep::Moved(self.cursor)
    }

    /// Step forward one version.
    pub fn redo(&mut self) -> HistoryStep {
        if self.entries.is_empty() || self.cursor + 1 >= self.entries.len() {
            return HistoryStep::AtEnd;
        }
        self.cursor += 1;
        debug!("Redo to version {}", self.cursor);
        HistoryStep::Moved(self.cursor)
    }

    /// Active version.
    pub fn current(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.cursor)
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    /// Drop every entry and its file.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the active version, `None` when empty.
    pub fn cursor(&self) -> Option<usize> {
        (!self.entries.is_empty()).then_some(self.cursor)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty() && self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }
}

#[derive(Debug)]
struct VersionFile {
    path: PathBuf,
}

impl Drop for VersionFile {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => warn!("Failed to remove {}: {err}", self.path.display()),
        }
    }
}
