use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by range operations on a [`super::SampleBuffer`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// Sample indices are reversed or fall outside `[0, len]`.
    #[error("Invalid sample range {start}..{end} for a buffer of {len} samples")]
    InvalidRange {
        start: usize,
        end: usize,
        len: usize,
    },
    /// Raw PCM bytes do not split into whole 16-bit samples.
    #[error("PCM data of {len} bytes is not aligned to 2-byte samples")]
    Misaligned { len: usize },
}

/// Errors raised while reading or writing the canonical WAV container.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: hound::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: hound::Error,
    },
    #[error("Sample error: {0}")]
    Decode(hound::Error),
    /// The container is valid WAV but not mono 16-bit PCM at 8 kHz.
    #[error(
        "Expected mono 16-bit PCM at 8000 Hz, found {channels} channel(s), {bits_per_sample}-bit at {sample_rate} Hz"
    )]
    NotCanonical {
        channels: u16,
        sample_rate: u32,
        bits_per_sample: u16,
    },
}
