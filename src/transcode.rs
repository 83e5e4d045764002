//! Conversion of arbitrary input audio into the canonical mono 8 kHz 16-bit WAV.
//!
//! The conversion is delegated to an external program. Callers treat any error as "use the input
//! as-is" and validate it themselves.

use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, ExitStatus, Stdio},
    thread,
    time::{Duration, Instant},
};

use thiserror::Error;
use tracing::{debug, info};

use crate::config::TranscoderSettings;
use crate::waveform::SAMPLE_RATE;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Failures of an external conversion.
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("Transcoder {program} was not found")]
    Missing { program: PathBuf },
    #[error("Failed to run transcoder {program}: {source}")]
    Spawn {
        program: PathBuf,
        source: std::io::Error,
    },
    #[error("Transcoder exited with {status}")]
    Failed { status: ExitStatus },
    #[error("Transcoder did not finish within {timeout:?}")]
    TimedOut { timeout: Duration },
    #[error("Transcoder produced no output at {path}")]
    NoOutput { path: PathBuf },
}

/// Path-in, path-out conversion to the canonical format.
pub trait Transcoder {
    /// Convert `input` into a canonical WAV at `output`, blocking until done.
    fn transcode(&self, input: &Path, output: &Path) -> Result<(), TranscodeError>;
}

/// Runs `ffmpeg` (or a compatible program) with a bounded wait.
#[derive(Clone, Debug)]
pub struct FfmpegTranscoder {
    program: PathBuf,
    timeout: Duration,
}

impl FfmpegTranscoder {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn from_settings(settings: &TranscoderSettings) -> Self {
        Self::new(settings.program.clone(), settings.timeout())
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command(&self, input: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-i")
            .arg(input)
            .arg("-y")
            .args(["-f", "wav", "-acodec", "pcm_s16le"])
            .arg("-ar")
            .arg(SAMPLE_RATE.to_string())
            .args(["-ac", "1"])
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }

    fn wait(&self, child: &mut std::process::Child) -> Result<ExitStatus, TranscodeError> {
        let deadline = Instant::now() + self.timeout;
        loop {
            let polled = child.try_wait().map_err(|source| self.spawn_error(source))?;
            if let Some(status) = polled {
                return Ok(status);
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(TranscodeError::TimedOut {
                    timeout: self.timeout,
                });
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    fn spawn_error(&self, source: std::io::Error) -> TranscodeError {
        if source.kind() == std::io::ErrorKind::NotFound {
            TranscodeError::Missing {
                program: self.program.clone(),
            }
        } else {
            TranscodeError::Spawn {
                program: self.program.clone(),
                source,
            }
        }
    }
}

impl Transcoder for FfmpegTranscoder {
    fn transcode(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
        // A stale file would read as success.
        let _ = fs::remove_file(output);
        debug!(
            "Transcoding {} -> {} with {}",
            input.display(),
            output.display(),
            self.program.display()
        );
        let started = Instant::now();
        let mut child = self
            .command(input, output)
            .spawn()
            .map_err(|source| self.spawn_error(source))?;
        let status = match self.wait(&mut child) {
            Ok(status) => status,
            Err(err) => {
                let _ = fs::remove_file(output);
                return Err(err);
            }
        };
        if !status.success() {
            let _ = fs::remove_file(output);
            return Err(TranscodeError::Failed { status });
        }
        if !output.is_file() {
            return Err(TranscodeError::NoOutput {
                path: output.to_path_buf(),
            });
        }
        info!(
            "Transcoded {} in {} ms",
            input.display(),
            started.elapsed().as_millis()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_program_is_reported() {
        let dir = tempdir().unwrap();
        let transcoder =
            FfmpegTranscoder::new("wavecut-no-such-transcoder", Duration::from_millis(500));
        let err = transcoder
            .transcode(&dir.path().join("in.mp3"), &dir.path().join("out.wav"))
            .unwrap_err();
        assert!(matches!(err, TranscodeError::Missing { .. }));
    }

    #[test]
    fn command_uses_canonical_arguments() {
        let transcoder = FfmpegTranscoder::from_settings(&TranscoderSettings::default());
        let cmd = transcoder.command(Path::new("in.mp3"), Path::new("out.wav"));
        let args: Vec<_> = cmd
            .get_args()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        assert_eq!(cmd.get_program(), "ffmpeg");
        assert_eq!(
            args,
            [
                "-i", "in.mp3", "-y", "-f", "wav", "-acodec", "pcm_s16le", "-ar", "8000", "-ac",
                "1", "out.wav"
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn success_without_output_is_a_failure() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.wav");
        std::fs::write(&output, b"stale").unwrap();
        let transcoder = FfmpegTranscoder::new("true", Duration::from_secs(5));
        let err = transcoder
            .transcode(&dir.path().join("in.mp3"), &output)
            .unwrap_err();
        assert!(matches!(err, TranscodeError::NoOutput { .. }));
        assert!(!output.exists());
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_a_failure() {
        let dir = tempdir().unwrap();
        let transcoder = FfmpegTranscoder::new("false", Duration::from_secs(5));
        let err = transcoder
            .transcode(&dir.path().join("in.mp3"), &dir.path().join("out.wav"))
            .unwrap_err();
        assert!(matches!(err, TranscodeError::Failed { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn timeout_kills_the_child_and_drops_partial_output() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let script = dir.path().join("slow-transcoder.sh");
        std::fs::write(
            &script,
            "#!/bin/sh\nfor last; do :; done\nprintf partial > \"$last\"\nexec sleep 5\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        let output = dir.path().join("out.wav");

        let transcoder = FfmpegTranscoder::new(&script, Duration::from_millis(500));
        let started = Instant::now();
        let err = transcoder
            .transcode(&dir.path().join("in.mp3"), &output)
            .unwrap_err();
        assert!(matches!(err, TranscodeError::TimedOut { .. }));
        assert!(started.elapsed() < Duration::from_secs(4));
        assert!(!output.exists());
    }
}
