use thiserror::Error;

use crate::passages::Tier;

/// Failures of the key-value store backing the leaderboard and preferences.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Passage corpus configuration errors. These surface at startup only.
#[derive(Debug, Error)]
pub enum PassageError {
    #[error("passage pool for tier `{0}` is empty")]
    EmptyPool(Tier),
    #[error("no passage pool for the medium fallback tier")]
    MissingFallback,
    #[error("corpus file `{file}` is unreadable: {reason}")]
    Corpus { file: String, reason: String },
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),
}
