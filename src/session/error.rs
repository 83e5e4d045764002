use std::path::PathBuf;

use thiserror::Error;

use crate::edit::EditError;
use crate::waveform::ContainerError;

use super::TempAreaError;

/// Failures of session operations. In-memory state is unchanged when one is returned.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No document is open")]
    NoDocument,
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error(transparent)]
    Container(#[from] ContainerError),
    #[error(transparent)]
    TempArea(#[from] TempAreaError),
    #[error("Failed to save to {path}: {source}")]
    Save {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl SessionError {
    /// True for refusals the user can act on, as opposed to I/O failures.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            SessionError::NoDocument
                | SessionError::Edit(
                    EditError::EmptySelection
                        | EditError::ClipboardEmpty
                        | EditError::ClipboardNotAudio { .. }
                )
        )
    }
}
