use std::{
    path::PathBuf,
    sync::mpsc::{self, Receiver, Sender},
};

use egui::{Pos2, Vec2};
use tracing::{debug, trace, warn};

use crate::selection::Selection;

use super::{EditStatus, EditorSession, OpenReport, SessionError};

/// Operations exported to a UI shell.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionCommand {
    Open(PathBuf),
    Save(PathBuf),
    Close,
    Cut,
    Copy,
    Paste,
    DeleteSegment,
    MuteSegment,
    Undo,
    Redo,
    SetZoom(u32),
    Seek { ms: f64 },
    SelectSamples { start: usize, end: usize },
}

/// Input delivered to the session, in arrival order.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    PointerPressed(Pos2),
    PointerMoved(Pos2),
    PointerReleased(Pos2),
    Wheel(f32),
    Resized(Vec2),
    PlaybackPosition { ms: f64 },
    PlaybackStopped,
    Command(SessionCommand),
}

/// Successful command results.
#[derive(Debug)]
pub enum CommandOutcome {
    Opened(OpenReport),
    Saved(PathBuf),
    Closed,
    Edited(EditStatus),
    Zoomed(u32),
    Seeked,
    Selected(Selection),
}

#[derive(Debug)]
pub struct CommandResult {
    pub command: SessionCommand,
    pub outcome: Result<CommandOutcome, SessionError>,
}

/// What one [`SessionDispatcher::pump`] did.
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub events: usize,
    pub redraw: bool,
    pub commands: Vec<CommandResult>,
}

/// Single-writer front of an [`EditorSession`].
///
/// Other threads hold cloned senders; all mutation happens in [`SessionDispatcher::pump`] on
/// the owning thread, so playback updates never interleave with an edit in progress.
pub struct SessionDispatcher {
    session: EditorSession,
    sender: Sender<SessionEvent>,
    receiver: Receiver<SessionEvent>,
}

impl SessionDispatcher {
    pub fn new(session: EditorSession) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            session,
            sender,
            receiver,
        }
    }

    pub fn sender(&self) -> Sender<SessionEvent> {
        self.sender.clone()
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    pub fn into_session(self) -> EditorSession {
        self.session
    }

    /// Apply every queued event in order.
    pub fn pump(&mut self) -> DispatchReport {
        let mut report = DispatchReport::default();
        while let Ok(event) = self.receiver.try_recv() {
            report.events += 1;
            self.apply(event, &mut report);
        }
        if report.events > 0 {
            trace!(
                "Dispatched {} events, {} commands",
                report.events,
                report.commands.len()
            );
        }
        report
    }

    fn apply(&mut self, event: SessionEvent, report: &mut DispatchReport) {
        let session = &mut self.session;
        let redraw = match event {
            SessionEvent::PointerPressed(pos) => session.pointer_pressed(pos).needs_redraw(),
            SessionEvent::PointerMoved(pos) => session.pointer_moved(pos).needs_redraw(),
            SessionEvent::PointerReleased(pos) => session.pointer_released(pos).needs_redraw(),
            SessionEvent::Wheel(delta) => session.wheel(delta).is_some(),
            SessionEvent::Resized(size) => {
                session.resize(size);
                true
            }
            SessionEvent::PlaybackPosition { ms } => session.seek(ms),
            SessionEvent::PlaybackStopped => session.playback_stopped(),
            SessionEvent::Command(command) => {
                let outcome = session.execute(&command);
                if let Err(err) = &outcome {
                    if err.is_user_facing() {
                        debug!("{command:?} refused: {err}");
                    } else {
                        warn!("{command:?} failed: {err}");
                    }
                }
                let redraw = outcome.is_ok();
                report.commands.push(CommandResult { command, outcome });
                redraw
            }
        };
        report.redraw |= redraw;
    }
}

impl EditorSession {
    /// Run one exported operation.
    pub fn execute(&mut self, command: &SessionCommand) -> Result<CommandOutcome, SessionError> {
        let outcome = match command {
            SessionCommand::Open(path) => CommandOutcome::Opened(self.open(path)?),
            SessionCommand::Save(path) => {
                self.save(path)?;
                CommandOutcome::Saved(path.clone())
            }
            SessionCommand::Close => {
                self.close();
                CommandOutcome::Closed
            }
            SessionCommand::Cut => CommandOutcome::Edited(self.cut()?),
            SessionCommand::Copy => CommandOutcome::Edited(self.copy()?),
            SessionCommand::Paste => CommandOutcome::Edited(self.paste()?),
            SessionCommand::DeleteSegment => CommandOutcome::Edited(self.delete_segment()?),
            SessionCommand::MuteSegment => CommandOutcome::Edited(self.mute_segment()?),
            SessionCommand::Undo => CommandOutcome::Edited(self.undo()?),
            SessionCommand::Redo => CommandOutcome::Edited(self.redo()?),
            SessionCommand::SetZoom(factor) => CommandOutcome::Zoomed(self.set_zoom(*factor)),
            SessionCommand::Seek { ms } => {
                self.seek(*ms);
                CommandOutcome::Seeked
            }
            SessionCommand::SelectSamples { start, end } => {
                CommandOutcome::Selected(self.select_samples(*start, *end))
            }
        };
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorSettings;
    use egui::pos2;

    #[test]
    fn pump_applies_events_in_order() {
        let mut dispatcher = SessionDispatcher::new(EditorSession::new(EditorSettings::default()));
        let sender = dispatcher.sender();
        sender
            .send(SessionEvent::Command(SessionCommand::SetZoom(8)))
            .unwrap();
        sender
            .send(SessionEvent::Command(SessionCommand::Cut))
            .unwrap();
        sender.send(SessionEvent::PointerPressed(pos2(100.0, 100.0))).unwrap();

        let report = dispatcher.pump();
        assert_eq!(report.events, 3);
        assert_eq!(report.commands.len(), 2);
        assert!(matches!(
            report.commands[0].outcome,
            Ok(CommandOutcome::Zoomed(8))
        ));
        assert!(matches!(
            report.commands[1].outcome,
            Err(SessionError::NoDocument)
        ));
        assert!(report.redraw);

        let idle = dispatcher.pump();
        assert_eq!(idle.events, 0);
        assert!(!idle.redraw);
    }
}
