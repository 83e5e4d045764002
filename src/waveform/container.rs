use std::io::Read;
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec};

use super::{ContainerError, SAMPLE_RATE, SampleBuffer};

/// WAV header parameters of the canonical format.
pub fn canonical_spec() -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

/// Read a canonical WAV file from disk.
pub fn read_canonical(path: &Path) -> Result<SampleBuffer, ContainerError> {
    let reader = WavReader::open(path).map_err(|source| ContainerError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    decode_reader(reader)
}

/// Write `buffer` to `path` as a canonical WAV file, replacing any existing file.
pub fn write_canonical(path: &Path, buffer: &SampleBuffer) -> Result<(), ContainerError> {
    let map_err = |source| ContainerError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = hound::WavWriter::create(path, canonical_spec()).map_err(map_err)?;
    for &sample in buffer.samples() {
        writer.write_sample(sample).map_err(map_err)?;
    }
    writer.finalize().map_err(map_err)
}

fn decode_reader<R: Read>(mut reader: WavReader<R>) -> Result<SampleBuffer, ContainerError> {
    let spec = reader.spec();
    if !is_canonical(spec) {
        return Err(ContainerError::NotCanonical {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        });
    }
    let samples: Vec<i16> = reader
        .samples::<i16>()
        .collect::<Result<_, _>>()
        .map_err(ContainerError::Decode)?;
    Ok(SampleBuffer::from_samples(samples))
}

fn is_canonical(spec: WavSpec) -> bool {
    spec.channels == 1
        && spec.sample_rate == SAMPLE_RATE
        && spec.bits_per_sample == 16
        && spec.sample_format == SampleFormat::Int
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_round_trip_keeps_samples() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("speech.wav");
        let buffer = SampleBuffer::from_samples(vec![0, 1, -1, i16::MAX, i16::MIN]);
        write_canonical(&path, &buffer).unwrap();
        assert_eq!(read_canonical(&path).unwrap(), buffer);
    }

    #[test]
    fn written_header_describes_canonical_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        write_canonical(&path, &SampleBuffer::from_samples(vec![7; 4])).unwrap();
        let reader = WavReader::open(&path).unwrap();
        assert_eq!(reader.spec(), canonical_spec());
        assert_eq!(reader.len(), 4);
    }

    #[test]
    fn rejects_non_canonical_wav() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        let spec = WavSpec {
            channels: 2,
            sample_rate: 44_100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        writer.write_sample(0i16).unwrap();
        writer.write_sample(0i16).unwrap();
        writer.finalize().unwrap();

        let err = read_canonical(&path).unwrap_err();
        assert!(matches!(
            err,
            ContainerError::NotCanonical {
                channels: 2,
                sample_rate: 44_100,
                bits_per_sample: 16
            }
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.wav");
        match read_canonical(&path) {
            Err(ContainerError::Open { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
