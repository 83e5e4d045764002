//! Per-session directory holding every materialized buffer version.

use std::{
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;
use time::{OffsetDateTime, format_description::FormatItem, macros::format_description};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::waveform::{ContainerError, SampleBuffer, write_canonical};

const VERSION_STAMP: &[FormatItem<'static>] = format_description!(
    "[year][month][day][hour][minute][second][subsecond digits:3]"
);

/// Temp area failures. Fatal to the operation, never to the in-memory state.
#[derive(Debug, Error)]
pub enum TempAreaError {
    #[error("Failed to create temp area {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to copy {from} into the temp area: {source}")]
    Import {
        from: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to format version timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
    #[error(transparent)]
    Materialize(#[from] ContainerError),
}

/// Scratch directory `session_<uuid>` under the configured temp root, removed on drop.
#[derive(Debug)]
pub struct TempArea {
    dir: PathBuf,
}

impl TempArea {
    pub fn create(root: &Path) -> Result<Self, TempAreaError> {
        let dir = root.join(format!("session_{}", Uuid::new_v4().simple()));
        fs::create_dir_all(&dir).map_err(|source| TempAreaError::Create {
            path: dir.clone(),
            source,
        })?;
        debug!("Temp area at {}", dir.display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Unused path `<source_name>_<yyyyMMddHHmmssfff>.wav`, with `_N` appended on collision.
    pub fn version_path(&self, source_name: &str) -> Result<PathBuf, TempAreaError> {
        let stamp = now_local_or_utc().format(VERSION_STAMP)?;
        let base = format!("{source_name}_{stamp}");
        let mut candidate = self.dir.join(format!("{base}.wav"));
        let mut counter = 1;
        while candidate.exists() {
            candidate = self.dir.join(format!("{base}_{counter}.wav"));
            counter += 1;
        }
        Ok(candidate)
    }

    /// Write `buffer` as a new canonical WAV version.
    pub fn materialize(
        &self,
        source_name: &str,
        buffer: &SampleBuffer,
    ) -> Result<PathBuf, TempAreaError> {
        let path = self.version_path(source_name)?;
        write_canonical(&path, buffer)?;
        Ok(path)
    }

    /// Copy an existing file into the area as a new version.
    pub fn import(&self, source_name: &str, from: &Path) -> Result<PathBuf, TempAreaError> {
        let path = self.version_path(source_name)?;
        fs::copy(from, &path).map_err(|source| TempAreaError::Import {
            from: from.to_path_buf(),
            source,
        })?;
        Ok(path)
    }
}

impl Drop for TempArea {
    fn drop(&mut self) {
        match fs::remove_dir_all(&self.dir) {
            Ok(()) => debug!("Removed temp area {}", self.dir.display()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => warn!("Failed to remove temp area {}: {err}", self.dir.display()),
        }
    }
}

fn now_local_or_utc() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn versions_get_unique_stamped_names() {
        let root = tempdir().unwrap();
        let area = TempArea::create(root.path()).unwrap();
        let buffer = SampleBuffer::from_samples(vec![1i16, 2, 3]);
        let first = area.materialize("take.wav", &buffer).unwrap();
        let second = area.materialize("take.wav", &buffer).unwrap();
        assert_ne!(first, second);
        for path in [&first, &second] {
            let name = path.file_name().unwrap().to_str().unwrap();
            assert!(name.starts_with("take.wav_"));
            assert!(name.ends_with(".wav"));
            assert!(path.is_file());
        }
        let stamp = &first.file_stem().unwrap().to_str().unwrap()["take.wav_".len()..];
        assert_eq!(stamp.len(), 17);
        assert!(stamp.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn drop_removes_the_directory() {
        let root = tempdir().unwrap();
        let area = TempArea::create(root.path()).unwrap();
        let dir = area.path().to_path_buf();
        area.materialize("a", &SampleBuffer::from_samples(vec![0i16; 8]))
            .unwrap();
        assert!(dir.is_dir());
        drop(area);
        assert!(!dir.exists());
    }
}
