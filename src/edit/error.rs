use thiserror::Error;

use crate::waveform::BufferError;

/// Reasons an edit was refused. The buffer is never partially changed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("Select a range first")]
    EmptySelection,
    #[error("Clipboard holds no audio")]
    ClipboardEmpty,
    /// Clipboard bytes do not split into whole 16-bit samples.
    #[error("Clipboard data ({len} bytes) is not 16-bit PCM audio")]
    ClipboardNotAudio { len: usize },
    #[error(transparent)]
    InvalidRange(#[from] BufferError),
}
