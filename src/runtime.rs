use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};
use tracing::warn;

pub const TICK_RATE_MS: u64 = 50;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum RaceEvent {
    Key(KeyEvent),
    Resize,
    Tick,
    /// The event source hung up; no further input will arrive
    Disconnected,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait RaceEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<RaceEvent, RecvTimeoutError>;
}

/// Production event source reading crossterm events on a background thread
pub struct CrosstermEventSource {
    rx: Receiver<RaceEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let evt = match event::read() {
                // Windows reports releases too; only presses are keystrokes
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => RaceEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => RaceEvent::Resize,
                Ok(_) => continue,
                Err(err) => {
                    warn!(target: "runtime", %err, "terminal event reader stopped");
                    break;
                }
            };
            if tx.send(evt).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RaceEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<RaceEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(Duration::from_millis(TICK_RATE_MS))
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Channel-fed event source for tests
pub struct TestEventSource {
    rx: Receiver<RaceEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<RaceEvent>) -> Self {
        Self { rx }
    }
}

impl RaceEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<RaceEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Advances the application one event or tick at a time
pub struct Runner<E: RaceEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: RaceEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to one tick interval; yields Tick when nothing arrived.
    /// Once the source is gone every call returns `Disconnected` immediately.
    pub fn step(&self) -> RaceEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => RaceEvent::Tick,
            Err(RecvTimeoutError::Disconnected) => RaceEvent::Disconnected,
        }
    }
}
