use std::path::Path;

use wavecut::waveform::canonical_spec;

/// Write a mono 8 kHz 16-bit WAV fixture.
pub fn write_canonical_wav(path: &Path, samples: &[i16]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create wav parent dirs");
    }
    let mut writer = hound::WavWriter::create(path, canonical_spec()).expect("create wav writer");
    for &sample in samples {
        writer.write_sample(sample).expect("write wav sample");
    }
    writer.finalize().expect("finalize wav");
}

/// Samples `0, 1, 2, ...` wrapping at `i16::MAX`, so every position is recognizable.
pub fn counting_samples(len: usize) -> Vec<i16> {
    (0..len).map(|i| (i % i16::MAX as usize) as i16).collect()
}

/// Write a fixture of `len` counting samples.
pub fn write_counting_wav(path: &Path, len: usize) -> Vec<i16> {
    let samples = counting_samples(len);
    write_canonical_wav(path, &samples);
    samples
}

/// Write a stereo 44.1 kHz file the editor cannot load without conversion.
pub fn write_stereo_wav(path: &Path, frames: usize) {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: 44_100,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).expect("create wav writer");
    for _ in 0..frames * 2 {
        writer.write_sample(0i16).expect("write wav sample");
    }
    writer.finalize().expect("finalize wav");
}
