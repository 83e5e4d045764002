use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default number of buffer versions kept for undo/redo.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;
/// Default interval between playback position polls.
pub const DEFAULT_PLAYBACK_POLL_MS: u64 = 100;
/// Default time allowed for the external transcoder.
pub const DEFAULT_TRANSCODE_TIMEOUT_MS: u64 = 2_000;

const MIN_PLAYBACK_POLL_MS: u64 = 10;
const MIN_TRANSCODE_TIMEOUT_MS: u64 = 100;
const MAX_TRANSCODE_TIMEOUT_MS: u64 = 600_000;
const MIN_TICK_SPACING_PX: f32 = 10.0;

/// Persisted editor settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Number of buffer versions retained by the edit history.
    pub history_capacity: usize,
    /// Parent directory for per-session temp areas; the OS temp dir when unset.
    pub temp_root: Option<PathBuf>,
    /// Interval between playback position polls, in milliseconds.
    pub playback_poll_ms: u64,
    pub transcoder: TranscoderSettings,
    pub layout: LayoutSettings,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            temp_root: None,
            playback_poll_ms: DEFAULT_PLAYBACK_POLL_MS,
            transcoder: TranscoderSettings::default(),
            layout: LayoutSettings::default(),
        }
    }
}

impl EditorSettings {
    /// Clamp loaded values into supported ranges.
    pub fn normalized(mut self) -> Self {
        self.history_capacity = self.history_capacity.max(1);
        self.playback_poll_ms = self.playback_poll_ms.max(MIN_PLAYBACK_POLL_MS);
        self.transcoder.timeout_ms = self
            .transcoder
            .timeout_ms
            .clamp(MIN_TRANSCODE_TIMEOUT_MS, MAX_TRANSCODE_TIMEOUT_MS);
        self.layout = self.layout.normalized();
        self
    }

    /// Directory under which session temp areas are created.
    pub fn temp_root(&self) -> PathBuf {
        self.temp_root
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("wavecut"))
    }

    pub fn playback_poll_interval(&self) -> Duration {
        Duration::from_millis(self.playback_poll_ms)
    }
}

/// External transcoder invocation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscoderSettings {
    /// Executable name or path.
    pub program: PathBuf,
    /// Time allowed before the child process is killed, in milliseconds.
    pub timeout_ms: u64,
}

impl Default for TranscoderSettings {
    fn default() -> Self {
        Self {
            program: PathBuf::from("ffmpeg"),
            timeout_ms: DEFAULT_TRANSCODE_TIMEOUT_MS,
        }
    }
}

impl TranscoderSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Geometry of the editor surface, in logical pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub margin_x: f32,
    pub margin_y: f32,
    /// Height of the overview strip that doubles as the scroll bar.
    pub overview_height: f32,
    pub time_scale_height: f32,
    /// Horizontal distance between time-scale ticks.
    pub tick_spacing_px: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            margin_x: 15.0,
            margin_y: 15.0,
            overview_height: 24.0,
            time_scale_height: 30.0,
            tick_spacing_px: 70.0,
        }
    }
}

impl LayoutSettings {
    fn normalized(self) -> Self {
        let defaults = Self::default();
        let non_negative = |value: f32, fallback: f32| {
            if value.is_finite() && value >= 0.0 {
                value
            } else {
                fallback
            }
        };
        Self {
            margin_x: non_negative(self.margin_x, defaults.margin_x),
            margin_y: non_negative(self.margin_y, defaults.margin_y),
            overview_height: non_negative(self.overview_height, defaults.overview_height),
            time_scale_height: non_negative(self.time_scale_height, defaults.time_scale_height),
            tick_spacing_px: non_negative(self.tick_spacing_px, defaults.tick_spacing_px)
                .max(MIN_TICK_SPACING_PX),
        }
    }
}
