use std::sync::Arc;

use super::BufferError;

/// Sample rate of every buffer handled by the editor.
pub const SAMPLE_RATE: u32 = 8_000;
/// Width of one canonical sample in bytes.
pub const BYTES_PER_SAMPLE: usize = 2;

/// Immutable mono 16-bit PCM samples.
///
/// Every edit returns a fresh buffer; clones share storage, so history snapshots are cheap.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SampleBuffer {
    samples: Arc<[i16]>,
}

impl SampleBuffer {
    /// Wrap already-decoded samples.
    pub fn from_samples(samples: impl Into<Arc<[i16]>>) -> Self {
        Self {
            samples: samples.into(),
        }
    }

    /// Build a buffer from header-less little-endian PCM bytes.
    pub fn load(bytes: &[u8]) -> Result<Self, BufferError> {
        let samples = pcm_bytes_to_samples(bytes)?;
        Ok(Self::from_samples(samples))
    }

    /// Serialize the buffer back to header-less little-endian PCM bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        samples_to_pcm_bytes(&self.samples)
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    /// Duration in whole milliseconds.
    pub fn duration_ms(&self) -> u64 {
        samples_to_ms(self.len())
    }

    /// Copy the half-open range `[start, end)` out as PCM bytes.
    pub fn range_bytes(&self, start: usize, end: usize) -> Result<Vec<u8>, BufferError> {
        self.check_range(start, end)?;
        Ok(samples_to_pcm_bytes(&self.samples[start..end]))
    }

    /// Return a new buffer with `[start, end)` removed.
    pub fn splice_out(&self, start: usize, end: usize) -> Result<Self, BufferError> {
        self.check_range(start, end)?;
        let mut kept = Vec::with_capacity(self.len() - (end - start));
        kept.extend_from_slice(&self.samples[..start]);
        kept.extend_from_slice(&self.samples[end..]);
        Ok(Self::from_samples(kept))
    }

    /// Return a new buffer with `inserted` PCM bytes placed before sample `at`.
    pub fn splice_in(&self, at: usize, inserted: &[u8]) -> Result<Self, BufferError> {
        self.check_range(at, at)?;
        let inserted = pcm_bytes_to_samples(inserted)?;
        let mut joined = Vec::with_capacity(self.len() + inserted.len());
        joined.extend_from_slice(&self.samples[..at]);
        joined.extend_from_slice(&inserted);
        joined.extend_from_slice(&self.samples[at..]);
        Ok(Self::from_samples(joined))
    }

    /// Return a new buffer with `[start, end)` silenced; the length is unchanged.
    pub fn mute(&self, start: usize, end: usize) -> Result<Self, BufferError> {
        self.check_range(start, end)?;
        let mut muted = self.samples.to_vec();
        muted[start..end].fill(0);
        Ok(Self::from_samples(muted))
    }

    fn check_range(&self, start: usize, end: usize) -> Result<(), BufferError> {
        let len = self.len();
        if start > end || end > len {
            return Err(BufferError::InvalidRange { start, end, len });
        }
        Ok(())
    }
}

/// Convert a sample count to milliseconds at the canonical rate, truncating.
pub fn samples_to_ms(samples: usize) -> u64 {
    samples as u64 * 1000 / SAMPLE_RATE as u64
}

/// Convert a playback time in milliseconds to a sample index, truncating.
pub fn ms_to_samples(ms: f64) -> usize {
    if !ms.is_finite() || ms <= 0.0 {
        return 0;
    }
    (ms * SAMPLE_RATE as f64 / 1000.0) as usize
}

fn pcm_bytes_to_samples(bytes: &[u8]) -> Result<Vec<i16>, BufferError> {
    if bytes.len() % BYTES_PER_SAMPLE != 0 {
        return Err(BufferError::Misaligned { len: bytes.len() });
    }
    Ok(bytes
        .chunks_exact(BYTES_PER_SAMPLE)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect())
}

fn samples_to_pcm_bytes(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}
