//! Periodic polling of an external playback clock.
//!
//! Audio output lives outside this crate; it only exposes whether it is playing and where it is.
//! The ticker turns that into [`SessionEvent`]s on the session's channel so position updates are
//! serialized with pointer input and edits.

use std::{
    io,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::Sender,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use tracing::{debug, trace};

use crate::session::SessionEvent;

/// Read-only view of an audio player.
pub trait PlaybackClock: Send + 'static {
    fn is_playing(&self) -> bool;
    /// Current playback position in milliseconds.
    fn position_ms(&self) -> f64;
}

/// Background thread forwarding playback positions until playback ends or it is stopped.
#[derive(Debug)]
pub struct PlaybackTicker {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl PlaybackTicker {
    /// Start polling `clock` every `interval`.
    ///
    /// Sends [`SessionEvent::PlaybackPosition`] while playing, then a single
    /// [`SessionEvent::PlaybackStopped`] and exits.
    pub fn spawn<C: PlaybackClock>(
        clock: C,
        events: Sender<SessionEvent>,
        interval: Duration,
    ) -> io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("wavecut-playback".to_string())
            .spawn(move || {
                while !thread_stop.load(Ordering::Relaxed) {
                    let event = if clock.is_playing() {
                        SessionEvent::PlaybackPosition {
                            ms: clock.position_ms(),
                        }
                    } else {
                        SessionEvent::PlaybackStopped
                    };
                    let finished = matches!(event, SessionEvent::PlaybackStopped);
                    trace!("Playback tick: {event:?}");
                    if events.send(event).is_err() || finished {
                        break;
                    }
                    thread::sleep(interval);
                }
                debug!("Playback ticker exiting");
            })?;
        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    /// True once the polling thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(|handle| handle.is_finished())
    }

    /// Ask the thread to exit and wait for it.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for PlaybackTicker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{atomic::AtomicU64, mpsc};

    /// Plays until `ticks` positions have been read.
    struct CountingClock {
        reads: Arc<AtomicU64>,
        ticks: u64,
    }

    impl PlaybackClock for CountingClock {
        fn is_playing(&self) -> bool {
            self.reads.load(Ordering::SeqCst) < self.ticks
        }

        fn position_ms(&self) -> f64 {
            let read = self.reads.fetch_add(1, Ordering::SeqCst);
            (read as f64 + 1.0) * 100.0
        }
    }

    #[test]
    fn forwards_positions_then_stop() {
        let (tx, rx) = mpsc::channel();
        let clock = CountingClock {
            reads: Arc::new(AtomicU64::new(0)),
            ticks: 3,
        };
        let mut ticker = PlaybackTicker::spawn(clock, tx, Duration::from_millis(1)).unwrap();
        let events: Vec<SessionEvent> = rx.iter().collect();
        ticker.stop();
        assert_eq!(
            events,
            vec![
                SessionEvent::PlaybackPosition { ms: 100.0 },
                SessionEvent::PlaybackPosition { ms: 200.0 },
                SessionEvent::PlaybackPosition { ms: 300.0 },
                SessionEvent::PlaybackStopped,
            ]
        );
        assert!(ticker.is_finished());
    }

    #[test]
    fn stop_ends_an_endless_clock() {
        struct Endless;
        impl PlaybackClock for Endless {
            fn is_playing(&self) -> bool {
                true
            }
            fn position_ms(&self) -> f64 {
                0.0
            }
        }
        let (tx, rx) = mpsc::channel();
        let mut ticker = PlaybackTicker::spawn(Endless, tx, Duration::from_millis(1)).unwrap();
        assert!(rx.recv().is_ok());
        ticker.stop();
        assert!(ticker.is_finished());
    }
}
