use tracing::info;

use crate::clipboard::ClipboardBridge;
use crate::selection::Selection;
use crate::waveform::{BYTES_PER_SAMPLE, SampleBuffer};

use super::EditError;

/// Buffer-changing edit kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditKind {
    Cut,
    Paste,
    Delete,
    Mute,
}

impl EditKind {
    /// Short label used for history entries and logs.
    pub fn label(self) -> &'static str {
        match self {
            EditKind::Cut => "cut",
            EditKind::Paste => "paste",
            EditKind::Delete => "delete",
            EditKind::Mute => "mute",
        }
    }
}

/// New buffer produced by an edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditResult {
    pub buffer: SampleBuffer,
    /// Sample where the cursor lands once the edit is applied.
    pub edit_point: usize,
    pub kind: EditKind,
}

/// Copy the selection to the clipboard, then remove it.
pub fn cut(
    buffer: &SampleBuffer,
    selection: &Selection,
    clipboard: &mut dyn ClipboardBridge,
) -> Result<EditResult, EditError> {
    let (start, end) = selected_range(buffer, selection)?;
    let bytes = buffer.range_bytes(start, end)?;
    let next = buffer.splice_out(start, end)?;
    clipboard.set_audio_bytes(bytes);
    Ok(applied(EditKind::Cut, next, start, end - start))
}

/// Copy the selection to the clipboard; returns the number of samples copied.
pub fn copy(
    buffer: &SampleBuffer,
    selection: &Selection,
    clipboard: &mut dyn ClipboardBridge,
) -> Result<usize, EditError> {
    let (start, end) = selected_range(buffer, selection)?;
    clipboard.set_audio_bytes(buffer.range_bytes(start, end)?);
    info!("Copied {} samples", end - start);
    Ok(end - start)
}

/// Insert the clipboard audio before the cursor; any range selection is ignored.
pub fn paste(
    buffer: &SampleBuffer,
    selection: &Selection,
    clipboard: &dyn ClipboardBridge,
) -> Result<EditResult, EditError> {
    if !clipboard.has_audio() {
        return Err(EditError::ClipboardEmpty);
    }
    let bytes = clipboard.audio_bytes().ok_or(EditError::ClipboardEmpty)?;
    if bytes.is_empty() {
        return Err(EditError::ClipboardEmpty);
    }
    if bytes.len() % BYTES_PER_SAMPLE != 0 {
        return Err(EditError::ClipboardNotAudio { len: bytes.len() });
    }
    let at = selection.cursor();
    debug_assert!(
        at <= buffer.len(),
        "cursor {at} beyond buffer of {} samples",
        buffer.len()
    );
    let next = buffer.splice_in(at, &bytes)?;
    Ok(applied(EditKind::Paste, next, at, bytes.len() / BYTES_PER_SAMPLE))
}

/// Remove the selection without touching the clipboard.
pub fn delete_segment(buffer: &SampleBuffer, selection: &Selection) -> Result<EditResult, EditError> {
    let (start, end) = selected_range(buffer, selection)?;
    let next = buffer.splice_out(start, end)?;
    Ok(applied(EditKind::Delete, next, start, end - start))
}

/// Silence the selection, keeping the length.
pub fn mute_segment(buffer: &SampleBuffer, selection: &Selection) -> Result<EditResult, EditError> {
    let (start, end) = selected_range(buffer, selection)?;
    let next = buffer.mute(start, end)?;
    Ok(applied(EditKind::Mute, next, start, end - start))
}

fn selected_range(
    buffer: &SampleBuffer,
    selection: &Selection,
) -> Result<(usize, usize), EditError> {
    if selection.is_empty() {
        return Err(EditError::EmptySelection);
    }
    let (start, end) = selection.bounds();
    debug_assert!(
        end <= buffer.len(),
        "selection [{start}, {end}) beyond buffer of {} samples",
        buffer.len()
    );
    Ok((start, end))
}

fn applied(kind: EditKind, buffer: SampleBuffer, edit_point: usize, samples: usize) -> EditResult {
    info!(
        "Applied {} of {samples} samples at {edit_point}; buffer now {} samples",
        kind.label(),
        buffer.len()
    );
    EditResult {
        buffer,
        edit_point,
        kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;

    fn ramp(len: usize) -> SampleBuffer {
        SampleBuffer::from_samples((0..len).map(|i| (i % 1000) as i16 + 1).collect::<Vec<_>>())
    }

    #[test]
    fn cut_moves_range_to_clipboard() {
        let buffer = ramp(32_000);
        let mut clipboard = MemoryClipboard::new();
        let selection = Selection::new(16_000, 8_000, 16_000);
        let result = cut(&buffer, &selection, &mut clipboard).unwrap();
        assert_eq!(result.kind, EditKind::Cut);
        assert_eq!(result.edit_point, 8_000);
        assert_eq!(result.buffer.len(), 24_000);
        assert_eq!(clipboard.audio_bytes().unwrap().len(), 16_000);
        assert_eq!(result.buffer.samples()[8_000], buffer.samples()[16_000]);
        assert_eq!(buffer.len(), 32_000);
    }

    #[test]
    fn range_edits_refuse_empty_selection() {
        let buffer = ramp(100);
        let mut clipboard = MemoryClipboard::new();
        let empty = Selection::collapsed(40);
        assert_eq!(
            cut(&buffer, &empty, &mut clipboard),
            Err(EditError::EmptySelection)
        );
        assert_eq!(
            copy(&buffer, &empty, &mut clipboard),
            Err(EditError::EmptySelection)
        );
        assert_eq!(delete_segment(&buffer, &empty), Err(EditError::EmptySelection));
        assert_eq!(mute_segment(&buffer, &empty), Err(EditError::EmptySelection));
        assert!(!clipboard.has_audio());
    }

    #[test]
    fn copy_leaves_buffer_alone() {
        let buffer = ramp(100);
        let mut clipboard = MemoryClipboard::new();
        let copied = copy(&buffer, &Selection::new(10, 20, 10), &mut clipboard).unwrap();
        assert_eq!(copied, 10);
        assert_eq!(
            clipboard.audio_bytes().unwrap(),
            buffer.range_bytes(10, 20).unwrap()
        );
    }

    #[test]
    fn paste_inserts_at_cursor_not_selection() {
        let buffer = ramp(100);
        let mut clipboard = MemoryClipboard::new();
        clipboard.set_audio_bytes(vec![0xff, 0x7f, 0x00, 0x80]);
        let selection = Selection::new(10, 20, 50);
        let result = paste(&buffer, &selection, &clipboard).unwrap();
        assert_eq!(result.edit_point, 50);
        assert_eq!(result.buffer.len(), 102);
        assert_eq!(&result.buffer.samples()[50..52], &[i16::MAX, i16::MIN]);
        assert_eq!(result.buffer.splice_out(50, 52).unwrap(), buffer);
    }

    #[test]
    fn paste_rejects_missing_or_malformed_audio() {
        let buffer = ramp(100);
        let mut clipboard = MemoryClipboard::new();
        let selection = Selection::collapsed(0);
        assert_eq!(
            paste(&buffer, &selection, &clipboard),
            Err(EditError::ClipboardEmpty)
        );
        clipboard.set_audio_bytes(vec![1, 2, 3]);
        assert_eq!(
            paste(&buffer, &selection, &clipboard),
            Err(EditError::ClipboardNotAudio { len: 3 })
        );
    }

    #[test]
    fn delete_and_mute_follow_buffer_rules() {
        let buffer = ramp(100);
        let selection = Selection::new(30, 60, 30);
        let deleted = delete_segment(&buffer, &selection).unwrap();
        assert_eq!(deleted.buffer.len(), 70);
        assert_eq!(deleted.kind, EditKind::Delete);

        let muted = mute_segment(&buffer, &selection).unwrap();
        assert_eq!(muted.buffer.len(), 100);
        assert!(muted.buffer.samples()[30..60].iter().all(|&s| s == 0));
        assert_eq!(muted.buffer.samples()[29], buffer.samples()[29]);
        assert_eq!(muted.buffer.samples()[60], buffer.samples()[60]);
        assert_eq!(muted.edit_point, 30);
    }
}
