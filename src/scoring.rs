//! Final score and live metrics.
//!
//! Every rate here divides by the configured session duration, so a session
//! stopped early is still scored against its full length.

use crate::session::SessionState;

pub const PASSAGE_WEIGHT: f64 = 25.0;
pub const ACCURACY_WEIGHT: f64 = 0.5;
pub const SPEED_WEIGHT: f64 = 0.5;
pub const SPEED_DIVISOR: f64 = 3.0;
pub const SPEED_CAP: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalMetrics {
    pub accuracy: u32,
    pub cpm: u64,
    pub kpm: u64,
    pub score: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveStats {
    pub time_remaining: u32,
    pub accuracy: u32,
    pub cpm: u64,
    pub passages: u64,
}

pub fn elapsed_minutes(configured_duration: u32) -> f64 {
    (1.0_f64 / 60.0).max(f64::from(configured_duration) / 60.0)
}

/// Rounded percentage, 0 when nothing was expected.
pub fn percentage(correct: u64, expected: u64) -> u32 {
    if expected == 0 {
        return 0;
    }
    ((correct as f64 / expected as f64) * 100.0).round() as u32
}

pub fn score(passages_completed: u64, accuracy: u32, cpm: u64) -> u64 {
    let speed = (cpm as f64 / SPEED_DIVISOR).min(SPEED_CAP);
    (passages_completed as f64 * PASSAGE_WEIGHT
        + f64::from(accuracy) * ACCURACY_WEIGHT
        + speed * SPEED_WEIGHT)
        .round() as u64
}

pub fn final_metrics(state: &SessionState) -> FinalMetrics {
    let minutes = elapsed_minutes(state.configured_duration);
    let accuracy = percentage(state.total_correct_chars, state.total_expected_chars);
    let cpm = (state.total_keystrokes as f64 / minutes).round() as u64;
    let kpm = (state.passages_completed as f64 / minutes).round() as u64;

    FinalMetrics {
        accuracy,
        cpm,
        kpm,
        score: score(state.passages_completed, accuracy, cpm),
    }
}

/// Correct positions of the current input, compared index by index.
pub fn live_correct_chars(target: &str, typed: &str) -> u64 {
    target
        .chars()
        .zip(typed.chars())
        .filter(|(expected, actual)| expected == actual)
        .count() as u64
}

/// History from completed passages plus the passage in progress.
pub fn live_accuracy(state: &SessionState) -> u32 {
    let expected = state.total_expected_chars + state.typed_text.chars().count() as u64;
    let correct =
        state.total_correct_chars + live_correct_chars(&state.target_text, &state.typed_text);
    percentage(correct, expected)
}

pub fn live_cpm(state: &SessionState) -> u64 {
    let elapsed = state.elapsed_secs();
    if elapsed <= 0 {
        return 0;
    }
    (state.total_keystrokes as f64 / (elapsed as f64 / 60.0)).round() as u64
}

pub fn live_stats(state: &SessionState) -> LiveStats {
    LiveStats {
        time_remaining: state.time_remaining,
        accuracy: live_accuracy(state),
        cpm: live_cpm(state),
        passages: state.passages_completed,
    }
}
