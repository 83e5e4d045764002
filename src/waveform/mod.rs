//! Canonical PCM storage, its WAV container, and the per-column waveform envelope.

mod buffer;
mod container;
mod envelope;
mod error;

pub use buffer::{BYTES_PER_SAMPLE, SAMPLE_RATE, SampleBuffer, ms_to_samples, samples_to_ms};
pub use container::{canonical_spec, read_canonical, write_canonical};
pub use envelope::{ColumnPeak, column_envelope};
pub use error::{BufferError, ContainerError};
