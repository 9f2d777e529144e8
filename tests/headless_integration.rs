use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use harf::app::App;
use harf::engine::SessionEngine;
use harf::passages::{PassageSource, Tier};
use harf::runtime::{FixedTicker, HarfEvent, ManualClock, Runner, TestEventSource, ThreadClock};
use harf::session::SessionStatus;
use harf::store::MemoryStore;

/// Serves the same passage every time
struct Fixed(&'static str);

impl PassageSource for Fixed {
    fn random(&mut self, _tier: Tier) -> String {
        self.0.to_string()
    }
}

fn key(c: char) -> HarfEvent {
    HarfEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

// Headless integration using the internal runtime + App without a TTY
#[test]
fn headless_typing_flow_completes_passages() {
    let engine = SessionEngine::new(Fixed("abc"), ManualClock::new(), Tier::Medium, 60);
    let mut app = App::new(engine, Box::new(MemoryStore::new()), None);

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    tx.send(HarfEvent::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)))
        .unwrap();
    for c in "abcabc".chars() {
        tx.send(key(c)).unwrap();
    }

    for _ in 0..50u32 {
        app.handle_event(runner.step());
    }

    let state = app.engine.state();
    assert_eq!(state.status, SessionStatus::Running);
    assert_eq!(state.passages_completed, 2);
    assert_eq!(state.total_expected_chars, 6);
    assert_eq!(state.total_keystrokes, 6);
}

#[test]
fn headless_reference_session_scores_76() {
    let engine = SessionEngine::new(Fixed("abc"), ManualClock::new(), Tier::Medium, 60);
    let mut app = App::new(engine, Box::new(MemoryStore::new()), None);

    app.handle_event(HarfEvent::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
    for c in "abc".chars() {
        app.handle_event(key(c));
    }
    let epoch = app.engine.timer_epoch().expect("timer armed on start");
    for _ in 0..60 {
        app.handle_event(HarfEvent::Second(epoch));
    }

    assert_eq!(app.engine.status(), SessionStatus::Finished);
    let summary = app.engine.summary().expect("summary after countdown");
    assert_eq!(summary.accuracy, 100);
    assert_eq!(summary.cpm, 3);
    assert_eq!(summary.kpm, 1);
    assert_eq!(summary.score, 76);
    assert_eq!(app.leaderboard.top().map(|e| e.score), Some(76));
}

#[test]
fn headless_timed_session_finishes_by_thread_clock() {
    let (tx, rx) = mpsc::channel();
    // a fast clock stands in for the one-second timer
    let clock = ThreadClock::with_interval(tx, Duration::from_millis(5));
    let engine = SessionEngine::new(Fixed("abc"), clock, Tier::Medium, 3);
    let mut app = App::new(engine, Box::new(MemoryStore::new()), None);

    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(20)),
    );

    app.engine.start();
    for _ in 0..200u32 {
        app.handle_event(runner.step());
        if app.engine.status() == SessionStatus::Finished {
            break;
        }
    }

    assert_eq!(app.engine.status(), SessionStatus::Finished);
    assert_eq!(app.engine.state().time_remaining, 0);
    assert_eq!(app.leaderboard.len(), 1);
}

#[test]
fn headless_reset_discards_in_flight_ticks() {
    let engine = SessionEngine::new(Fixed("abc"), ManualClock::new(), Tier::Medium, 60);
    let mut app = App::new(engine, Box::new(MemoryStore::new()), None);

    app.engine.start();
    let first = app.engine.timer_epoch().unwrap();
    app.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL));
    app.engine.start();
    let second = app.engine.timer_epoch().unwrap();
    assert_ne!(first, second);

    // a tick the first timer queued just before it was cancelled
    app.handle_event(HarfEvent::Second(first));
    assert_eq!(app.engine.state().time_remaining, 60);

    app.handle_event(HarfEvent::Second(second));
    assert_eq!(app.engine.state().time_remaining, 59);
    assert!(app.engine.clock().armed()[0].is_cancelled());
}

#[test]
fn headless_stop_records_once() {
    let engine = SessionEngine::new(Fixed("abc"), ManualClock::new(), Tier::Easy, 60);
    let mut app = App::new(engine, Box::new(MemoryStore::new()), None);

    app.handle_event(HarfEvent::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
    app.handle_event(HarfEvent::Paste("abc".to_string()));
    let epoch = app.engine.timer_epoch().unwrap();
    app.stop();
    app.stop();
    app.handle_event(HarfEvent::Second(epoch));

    assert_eq!(app.leaderboard.len(), 1);
    assert!(app.show_results);
    assert_eq!(app.engine.state().total_keystrokes, 1);
}
