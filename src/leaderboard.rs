use serde::{Deserialize, Serialize};

use crate::session::SessionSummary;

pub const LEADERBOARD_CAP: usize = 10;

pub type LeaderboardEntry = SessionSummary;

/// Finished sessions ranked by score, highest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from previously stored entries, re-applying rank order and cap.
    pub fn from_entries(entries: Vec<LeaderboardEntry>) -> Self {
        let mut board = Self { entries };
        board.normalize();
        board
    }

    /// Insert a result. Equal scores keep their insertion order.
    pub fn record(&mut self, summary: SessionSummary) -> &[LeaderboardEntry] {
        self.entries.push(summary);
        self.normalize();
        &self.entries
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top(&self) -> Option<&LeaderboardEntry> {
        self.entries.first()
    }

    fn normalize(&mut self) {
        // stable sort keeps earlier entries ahead on ties
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(LEADERBOARD_CAP);
    }
}
