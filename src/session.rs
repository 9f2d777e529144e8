use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::passages::Tier;

pub const DEFAULT_DURATION_SECS: u32 = 60;
pub const GUEST_NAME: &str = "Guest";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Running,
    Finished,
}

/// Mutable state of one practice attempt, owned by the engine
#[derive(Debug, Clone)]
pub struct SessionState {
    pub status: SessionStatus,
    pub tier: Tier,
    pub target_text: String,
    pub typed_text: String,
    pub time_remaining: u32,
    pub configured_duration: u32,
    // Cumulative across every passage completed in this session
    pub total_keystrokes: u64,
    pub total_correct_chars: u64,
    pub total_expected_chars: u64,
    pub passages_completed: u64,
}

impl SessionState {
    pub fn new(tier: Tier, target_text: String, configured_duration: u32) -> Self {
        Self {
            status: SessionStatus::Idle,
            tier,
            target_text,
            typed_text: String::new(),
            time_remaining: configured_duration,
            configured_duration,
            total_keystrokes: 0,
            total_correct_chars: 0,
            total_expected_chars: 0,
            passages_completed: 0,
        }
    }

    pub fn clear_counters(&mut self) {
        self.total_keystrokes = 0;
        self.total_correct_chars = 0;
        self.total_expected_chars = 0;
        self.passages_completed = 0;
    }

    pub fn elapsed_secs(&self) -> i64 {
        i64::from(self.configured_duration) - i64::from(self.time_remaining)
    }
}

/// Snapshot of a finished session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub name: String,
    pub tier: String,
    pub duration_secs: u32,
    pub words: u64,
    pub accuracy: u32,
    pub kpm: u64,
    pub cpm: u64,
    pub score: u64,
    pub completed_at: DateTime<Local>,
}

impl SessionSummary {
    pub fn tier(&self) -> Tier {
        Tier::from_key(&self.tier)
    }

    pub fn date(&self) -> String {
        self.completed_at.format("%d/%m/%Y").to_string()
    }
}

/// Blank names are recorded as the guest name.
pub fn display_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        GUEST_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_state_is_idle_and_zeroed() {
        let state = SessionState::new(Tier::Easy, "باب".to_string(), 120);

        assert_eq!(state.status, SessionStatus::Idle);
        assert_eq!(state.time_remaining, 120);
        assert_eq!(state.configured_duration, 120);
        assert!(state.typed_text.is_empty());
        assert_eq!(state.total_keystrokes, 0);
        assert_eq!(state.passages_completed, 0);
        assert_eq!(state.elapsed_secs(), 0);
    }

    #[test]
    fn test_elapsed_secs() {
        let mut state = SessionState::new(Tier::Easy, "باب".to_string(), 60);
        state.time_remaining = 45;

        assert_eq!(state.elapsed_secs(), 15);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("  Aisha "), "Aisha");
        assert_eq!(display_name("   "), GUEST_NAME);
        assert_eq!(display_name(""), GUEST_NAME);
    }

    #[test]
    fn test_summary_date_format() {
        let summary = SessionSummary {
            name: "Guest".into(),
            tier: "hard".into(),
            duration_secs: 60,
            words: 1,
            accuracy: 100,
            kpm: 1,
            cpm: 3,
            score: 76,
            completed_at: Local.with_ymd_and_hms(2024, 3, 9, 10, 30, 0).unwrap(),
        };

        assert_eq!(summary.date(), "09/03/2024");
        assert_eq!(summary.tier(), Tier::Hard);
    }
}
