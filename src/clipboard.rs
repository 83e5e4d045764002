//! Raw PCM exchange for copy and paste.

use tracing::debug;

/// Clipboard holding header-less canonical PCM bytes.
pub trait ClipboardBridge {
    /// True when audio bytes are available for paste.
    fn has_audio(&self) -> bool;
    /// Copy of the stored audio bytes, if any.
    fn audio_bytes(&self) -> Option<Vec<u8>>;
    /// Replace the stored audio bytes.
    fn set_audio_bytes(&mut self, bytes: Vec<u8>);
}

/// In-process clipboard used when no system clipboard is wired in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryClipboard {
    audio: Option<Vec<u8>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the stored audio.
    pub fn clear(&mut self) {
        self.audio = None;
    }
}

impl ClipboardBridge for MemoryClipboard {
    fn has_audio(&self) -> bool {
        self.audio.as_ref().is_some_and(|bytes| !bytes.is_empty())
    }

    fn audio_bytes(&self) -> Option<Vec<u8>> {
        self.audio.clone()
    }

    fn set_audio_bytes(&mut self, bytes: Vec<u8>) {
        debug!("Clipboard holds {} bytes of audio", bytes.len());
        self.audio = Some(bytes);
    }
}
