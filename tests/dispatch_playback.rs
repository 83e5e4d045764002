//! Playback positions and commands funneled through one dispatcher.

mod support;

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::{Duration, Instant},
};

use egui::pos2;
use support::wav::write_counting_wav;
use wavecut::config::EditorSettings;
use wavecut::playback::{PlaybackClock, PlaybackTicker};
use wavecut::selection::PointerState;
use wavecut::session::{
    CommandOutcome, EditStatus, EditorSession, SessionCommand, SessionDispatcher, SessionEvent,
};

/// Plays through a fixed list of positions, one per poll.
struct ScriptedClock {
    positions: Arc<Mutex<Vec<f64>>>,
    playing: Arc<AtomicBool>,
}

impl PlaybackClock for ScriptedClock {
    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    fn position_ms(&self) -> f64 {
        let mut positions = self.positions.lock().unwrap();
        let next = positions.remove(0);
        if positions.is_empty() {
            self.playing.store(false, Ordering::SeqCst);
        }
        next
    }
}

fn open_dispatcher(len: usize) -> (SessionDispatcher, tempfile::TempDir) {
    let temp = tempfile::tempdir().unwrap();
    let input = temp.path().join("take.wav");
    write_counting_wav(&input, len);
    let mut settings = EditorSettings {
        temp_root: Some(temp.path().join("scratch")),
        playback_poll_ms: 10,
        ..EditorSettings::default()
    };
    settings.transcoder.program = "wavecut-missing-transcoder".into();
    let mut dispatcher = SessionDispatcher::new(EditorSession::new(settings));
    dispatcher
        .sender()
        .send(SessionEvent::Command(SessionCommand::Open(input)))
        .unwrap();
    let report = dispatcher.pump();
    assert!(matches!(
        report.commands[0].outcome,
        Ok(CommandOutcome::Opened(_))
    ));
    (dispatcher, temp)
}

fn wait_until_finished(ticker: &PlaybackTicker) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !ticker.is_finished() {
        assert!(Instant::now() < deadline, "ticker did not finish");
        thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn playback_pages_forward_then_rewinds() {
    let (mut dispatcher, _temp) = open_dispatcher(32_000);
    let sender = dispatcher.sender();
    sender
        .send(SessionEvent::Command(SessionCommand::SetZoom(4)))
        .unwrap();
    dispatcher.pump();

    let clock = ScriptedClock {
        positions: Arc::new(Mutex::new(vec![500.0, 1_000.0, 1_500.0])),
        playing: Arc::new(AtomicBool::new(true)),
    };
    let interval = dispatcher.session().settings().playback_poll_interval();
    let ticker = PlaybackTicker::spawn(clock, sender.clone(), interval).unwrap();
    wait_until_finished(&ticker);

    let report = dispatcher.pump();
    assert_eq!(report.events, 4);
    assert!(report.redraw);
    assert_eq!(dispatcher.session().selection().cursor(), 0);
    assert_eq!(dispatcher.session().viewport().page_start(), 0);
}

#[test]
fn positions_apply_in_order_with_commands() {
    let (mut dispatcher, _temp) = open_dispatcher(32_000);
    let sender = dispatcher.sender();
    sender
        .send(SessionEvent::Command(SessionCommand::SetZoom(4)))
        .unwrap();
    sender
        .send(SessionEvent::PlaybackPosition { ms: 1_000.0 })
        .unwrap();
    sender
        .send(SessionEvent::Command(SessionCommand::SelectSamples {
            start: 9_000,
            end: 10_000,
        }))
        .unwrap();
    sender
        .send(SessionEvent::Command(SessionCommand::DeleteSegment))
        .unwrap();

    let report = dispatcher.pump();
    assert_eq!(report.events, 4);
    let session = dispatcher.session();
    assert_eq!(session.viewport().page_start(), 8_000);
    assert_eq!(session.buffer().len(), 31_000);
    assert!(matches!(
        report.commands.last().unwrap().outcome,
        Ok(CommandOutcome::Edited(EditStatus::Applied(_)))
    ));
}

#[test]
fn pointer_events_drive_selection() {
    let (mut dispatcher, _temp) = open_dispatcher(32_000);
    let sender = dispatcher.sender();
    sender
        .send(SessionEvent::PointerPressed(pos2(215.0, 100.0)))
        .unwrap();
    sender
        .send(SessionEvent::PointerMoved(pos2(300.0, 100.0)))
        .unwrap();
    dispatcher.pump();
    assert_eq!(
        dispatcher.session().controller().state(),
        PointerState::Selecting
    );

    sender
        .send(SessionEvent::PointerReleased(pos2(415.0, 100.0)))
        .unwrap();
    sender
        .send(SessionEvent::Command(SessionCommand::Cut))
        .unwrap();
    let report = dispatcher.pump();
    assert!(report.redraw);

    let session = dispatcher.into_session();
    assert_eq!(session.controller().state(), PointerState::Idle);
    assert_eq!(session.buffer().len(), 24_000);
    assert_eq!(session.clipboard().audio_bytes().unwrap().len(), 16_000);
}
