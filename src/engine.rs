use chrono::Local;

use crate::feedback::{self, CharMark};
use crate::passages::{PassageSource, Tier};
use crate::runtime::{Clock, TimerHandle};
use crate::scoring::{self, LiveStats};
use crate::session::{display_name, SessionState, SessionStatus, SessionSummary};

/// Result of feeding one input-change event to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// The session is not running, nothing changed
    Ignored,
    Typed,
    /// The input matched the passage exactly and a new passage was staged
    PassageCompleted,
}

/// State machine for one practice attempt
pub struct SessionEngine<P: PassageSource, C: Clock> {
    state: SessionState,
    passages: P,
    clock: C,
    timer: Option<TimerHandle>,
    epoch: u64,
    player_name: String,
    summary: Option<SessionSummary>,
}

impl<P: PassageSource, C: Clock> SessionEngine<P, C> {
    pub fn new(mut passages: P, clock: C, tier: Tier, configured_duration: u32) -> Self {
        let target = passages.random(tier);
        Self {
            state: SessionState::new(tier, target, configured_duration),
            passages,
            clock,
            timer: None,
            epoch: 0,
            player_name: String::new(),
            summary: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn status(&self) -> SessionStatus {
        self.state.status
    }

    pub fn is_running(&self) -> bool {
        self.state.status == SessionStatus::Running
    }

    /// Summary of the most recently finished session.
    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn set_player_name(&mut self, name: impl Into<String>) {
        self.player_name = name.into();
    }

    /// Epoch of the armed timer, if the countdown is active.
    pub fn timer_epoch(&self) -> Option<u64> {
        self.timer.as_ref().map(TimerHandle::epoch)
    }

    /// Begin a new timed session on the staged passage. No-op while running.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }

        self.stop_timer();
        self.state.typed_text.clear();
        self.state.clear_counters();
        self.state.time_remaining = self.state.configured_duration;
        self.state.status = SessionStatus::Running;

        self.epoch += 1;
        self.timer = Some(self.clock.every_second(self.epoch));

        log::info!(
            "session started: tier={} duration={}s",
            self.state.tier,
            self.state.configured_duration
        );
        true
    }

    /// Advance the countdown by one second, finishing when it reaches zero.
    pub fn tick(&mut self) -> Option<SessionSummary> {
        if !self.is_running() {
            return None;
        }

        self.state.time_remaining = self.state.time_remaining.saturating_sub(1);
        if self.state.time_remaining == 0 {
            return self.finish();
        }
        None
    }

    /// Deliver a tick from the clock. Ticks from cancelled timers are dropped.
    pub fn on_clock_tick(&mut self, epoch: u64) -> Option<SessionSummary> {
        match &self.timer {
            Some(timer) if timer.epoch() == epoch && !timer.is_cancelled() => self.tick(),
            _ => {
                log::trace!("dropping stale tick for epoch {epoch}");
                None
            }
        }
    }

    /// Every call counts as one keystroke, however much the buffer changed.
    pub fn submit_input(&mut self, new_text: &str) -> InputOutcome {
        if !self.is_running() {
            return InputOutcome::Ignored;
        }

        self.state.total_keystrokes += 1;
        self.state.typed_text = new_text.to_string();

        if self.state.typed_text != self.state.target_text {
            return InputOutcome::Typed;
        }

        let completed = self.state.target_text.chars().count() as u64;
        self.state.passages_completed += 1;
        self.state.total_expected_chars += completed;
        self.state.total_correct_chars += completed;
        log::debug!(
            "passage completed ({completed} chars), total {}",
            self.state.passages_completed
        );

        self.stage_passage();
        InputOutcome::PassageCompleted
    }

    /// Stop the countdown and score the session. No-op unless running.
    pub fn finish(&mut self) -> Option<SessionSummary> {
        if !self.is_running() {
            return None;
        }

        self.stop_timer();
        self.state.status = SessionStatus::Finished;

        let metrics = scoring::final_metrics(&self.state);
        let summary = SessionSummary {
            name: display_name(&self.player_name),
            tier: self.state.tier.key().to_string(),
            duration_secs: self.state.configured_duration,
            words: self.state.passages_completed,
            accuracy: metrics.accuracy,
            kpm: metrics.kpm,
            cpm: metrics.cpm,
            score: metrics.score,
            completed_at: Local::now(),
        };

        log::info!(
            "session finished: score={} words={} acc={}% cpm={}",
            summary.score,
            summary.words,
            summary.accuracy,
            summary.cpm
        );

        self.summary = Some(summary.clone());
        Some(summary)
    }

    pub fn reset(&mut self, keep_passage: bool) {
        self.stop_timer();
        self.state.status = SessionStatus::Idle;
        self.state.clear_counters();
        self.state.typed_text.clear();
        self.state.time_remaining = self.state.configured_duration;

        if !keep_passage {
            self.stage_passage();
        }
    }

    /// Serve a fresh passage without touching counters or status.
    pub fn skip_passage(&mut self) {
        self.stage_passage();
    }

    /// Switch tier and stage a passage from it. Ignored while running.
    pub fn set_tier(&mut self, tier: Tier) {
        if self.is_running() {
            return;
        }
        self.state.tier = tier;
        self.stage_passage();
    }

    /// Change the session length. Ignored while running.
    pub fn set_duration(&mut self, secs: u32) {
        if self.is_running() {
            return;
        }
        self.state.configured_duration = secs;
        if self.state.status == SessionStatus::Idle {
            self.state.time_remaining = secs;
        }
    }

    pub fn live_stats(&self) -> LiveStats {
        scoring::live_stats(&self.state)
    }

    pub fn highlights(&self) -> Vec<CharMark> {
        feedback::highlight(&self.state.target_text, &self.state.typed_text)
    }

    fn stage_passage(&mut self) {
        self.state.typed_text.clear();
        self.state.target_text = self.passages.random(self.state.tier);
    }

    fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }
}
