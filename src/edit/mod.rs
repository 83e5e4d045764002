//! Destructive edits over the current buffer and selection.
//!
//! Every operation returns a new [`crate::waveform::SampleBuffer`]; the input is untouched, so a
//! refused edit leaves nothing to roll back.

mod error;
mod ops;

pub use error::EditError;
pub use ops::{EditKind, EditResult, copy, cut, delete_segment, mute_segment, paste};
