use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

pub const SECOND: Duration = Duration::from_secs(1);

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum HarfEvent {
    Key(KeyEvent),
    Paste(String),
    Resize,
    /// One second elapsed on the timer armed for this epoch
    Second(u64),
    /// Nothing arrived within the redraw interval
    Idle,
}

/// Source of terminal and timer events
pub trait HarfEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<HarfEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    tx: Sender<HarfEvent>,
    rx: Receiver<HarfEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let reader_tx = tx.clone();

        std::thread::spawn(move || loop {
            let evt = match event::read() {
                Ok(CtEvent::Key(key)) if key.kind != KeyEventKind::Release => HarfEvent::Key(key),
                Ok(CtEvent::Paste(text)) => HarfEvent::Paste(text),
                Ok(CtEvent::Resize(_, _)) => HarfEvent::Resize,
                Ok(_) => continue,
                Err(e) => {
                    log::error!("terminal event stream closed: {e}");
                    break;
                }
            };
            if reader_tx.send(evt).is_err() {
                break;
            }
        });

        Self { tx, rx }
    }

    /// Sender feeding the same queue, for timer threads.
    pub fn sender(&self) -> Sender<HarfEvent> {
        self.tx.clone()
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl HarfEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<HarfEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<HarfEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<HarfEvent>) -> Self {
        Self { rx }
    }
}

impl HarfEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<HarfEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable redraw interval
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

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Runner that advances the application one event at a time
pub struct Runner<E: HarfEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: HarfEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to the redraw interval and returns the next event, or Idle on timeout
    pub fn step(&self) -> HarfEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => HarfEvent::Idle,
        }
    }
}

/// Cancellation handle for an armed one-second timer
#[derive(Debug, Clone)]
pub struct TimerHandle {
    epoch: u64,
    cancelled: Arc<AtomicBool>,
}

impl TimerHandle {
    pub fn new(epoch: u64) -> Self {
        Self {
            epoch,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Scheduling source that drives the session countdown
pub trait Clock {
    /// Arm a timer delivering one tick per second, tagged with `epoch`.
    fn every_second(&mut self, epoch: u64) -> TimerHandle;
}

/// Background-thread clock that posts `HarfEvent::Second` into the event queue
#[derive(Debug, Clone)]
pub struct ThreadClock {
    tx: Sender<HarfEvent>,
    interval: Duration,
}

impl ThreadClock {
    pub fn new(tx: Sender<HarfEvent>) -> Self {
        Self {
            tx,
            interval: SECOND,
        }
    }

    pub fn with_interval(tx: Sender<HarfEvent>, interval: Duration) -> Self {
        Self { tx, interval }
    }
}

impl Clock for ThreadClock {
    fn every_second(&mut self, epoch: u64) -> TimerHandle {
        let handle = TimerHandle::new(epoch);
        let timer = handle.clone();
        let tx = self.tx.clone();
        let interval = self.interval;

        std::thread::spawn(move || loop {
            std::thread::sleep(interval);
            if timer.is_cancelled() || tx.send(HarfEvent::Second(timer.epoch())).is_err() {
                break;
            }
        });

        handle
    }
}

/// Clock that never fires on its own; tests call `tick()` directly.
#[derive(Debug, Default)]
pub struct ManualClock {
    armed: Vec<TimerHandle>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn armed(&self) -> &[TimerHandle] {
        &self.armed
    }

    /// The most recently armed handle that is still live.
    pub fn live(&self) -> Option<&TimerHandle> {
        self.armed.iter().rev().find(|h| !h.is_cancelled())
    }
}

impl Clock for ManualClock {
    fn every_second(&mut self, epoch: u64) -> TimerHandle {
        let handle = TimerHandle::new(epoch);
        self.armed.push(handle.clone());
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn step_returns_idle_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let es = TestEventSource::new(rx);
        let runner = Runner::new(es, FixedTicker::new(Duration::from_millis(1)));

        match runner.step() {
            HarfEvent::Idle => {}
            other => panic!("expected Idle on timeout, got {other:?}"),
        }
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(HarfEvent::Second(3)).unwrap();
        let es = TestEventSource::new(rx);
        let runner = Runner::new(es, FixedTicker::new(Duration::from_millis(10)));

        match runner.step() {
            HarfEvent::Second(3) => {}
            other => panic!("expected Second(3), got {other:?}"),
        }
    }

    #[test]
    fn timer_handle_cancel_is_shared() {
        let handle = TimerHandle::new(1);
        let copy = handle.clone();

        assert!(!copy.is_cancelled());
        handle.cancel();
        assert!(copy.is_cancelled());
        assert_eq!(copy.epoch(), 1);
    }

    #[test]
    fn thread_clock_delivers_epoch_tagged_ticks() {
        let (tx, rx) = mpsc::channel();
        let mut clock = ThreadClock::with_interval(tx, Duration::from_millis(5));

        let handle = clock.every_second(9);

        match rx.recv_timeout(Duration::from_secs(2)) {
            Ok(HarfEvent::Second(epoch)) => assert_eq!(epoch, 9),
            other => panic!("expected a tick, got {other:?}"),
        }
        handle.cancel();
    }

    #[test]
    fn thread_clock_stops_after_cancel() {
        let (tx, rx) = mpsc::channel();
        let mut clock = ThreadClock::with_interval(tx, Duration::from_millis(5));

        let handle = clock.every_second(1);
        handle.cancel();
        // at most one tick can already be in flight
        std::thread::sleep(Duration::from_millis(50));
        let delivered = rx.try_iter().count();

        assert!(delivered <= 1, "cancelled timer kept firing: {delivered}");
    }

    #[test]
    fn manual_clock_tracks_live_handle() {
        let mut clock = ManualClock::new();
        let first = clock.every_second(1);
        let _second = clock.every_second(2);

        assert_eq!(clock.armed().len(), 2);
        assert_eq!(clock.live().map(TimerHandle::epoch), Some(2));

        first.cancel();
        assert_eq!(clock.live().map(TimerHandle::epoch), Some(2));
    }
}
