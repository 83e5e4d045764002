//! Editor settings persisted as TOML in the app directory.

mod error;
mod io;
mod types;

pub use error::ConfigError;
pub use io::{CONFIG_FILE_NAME, config_path, load_from, load_or_default, save, save_to_path};
pub use types::{
    DEFAULT_HISTORY_CAPACITY, DEFAULT_PLAYBACK_POLL_MS, DEFAULT_TRANSCODE_TIMEOUT_MS,
    EditorSettings, LayoutSettings, TranscoderSettings,
};
