//! Sample-accurate waveform editing for mono 8 kHz 16-bit PCM.
//!
//! The crate models what a waveform editor shows and how edits change the audio; drawing,
//! audio output, and file dialogs are left to the host.
/// Per-user app directories.
pub mod app_dirs;
/// Clipboard exchange of raw PCM bytes.
pub mod clipboard;
/// Persisted editor settings.
pub mod config;
/// Cut, copy, paste, delete, and mute over a sample buffer.
pub mod edit;
/// Bounded undo/redo history of buffer versions.
pub mod history;
/// Screen-space regions of the editor surface.
pub mod layout;
/// Logging setup for the binary.
pub mod logging;
/// Polling of an external playback clock.
pub mod playback;
/// Selection state and pointer interaction.
pub mod selection;
/// Editor session, temp area, event dispatch, and draw model.
pub mod session;
/// External conversion to the canonical format.
pub mod transcode;
/// Sample/pixel mapping under zoom and pan.
pub mod viewport;
/// Sample buffer, WAV container, and envelope.
pub mod waveform;
