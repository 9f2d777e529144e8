use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::error::HistoryError;
use crate::session::SessionSummary;

/// One line of the session log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub date: String,
    pub name: String,
    pub tier: String,
    pub duration: u32,
    pub words: u64,
    pub accuracy: u32,
    pub kpm: u64,
    pub cpm: u64,
    pub score: u64,
}

impl From<&SessionSummary> for HistoryRecord {
    fn from(s: &SessionSummary) -> Self {
        Self {
            date: s.completed_at.to_rfc3339(),
            name: s.name.clone(),
            tier: s.tier.clone(),
            duration: s.duration_secs,
            words: s.words,
            accuracy: s.accuracy,
            kpm: s.kpm,
            cpm: s.cpm,
            score: s.score,
        }
    }
}

/// Append-only CSV log of every finished session
#[derive(Debug, Clone)]
pub struct SessionLog {
    path: PathBuf,
}

impl SessionLog {
    pub fn new() -> Option<Self> {
        AppDirs::history_path().map(Self::at)
    }

    pub fn at<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, summary: &SessionSummary) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // If the log doesn't exist yet, we need to emit a header
        let needs_header = !self.path.exists();

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(HistoryRecord::from(summary))?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use tempfile::tempdir;

    fn records(log: &SessionLog) -> Result<Vec<HistoryRecord>, HistoryError> {
        let mut reader = csv::Reader::from_path(log.path())?;
        let records = reader.deserialize().collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn summary(score: u64) -> SessionSummary {
        SessionSummary {
            name: "Guest".into(),
            tier: "easy".into(),
            duration_secs: 120,
            words: 3,
            accuracy: 100,
            kpm: 2,
            cpm: 40,
            score,
            completed_at: Local::now(),
        }
    }

    #[test]
    fn test_append_writes_header_once() {
        let dir = tempdir().unwrap();
        let log = SessionLog::at(dir.path().join("state").join("history.csv"));

        log.append(&summary(10)).unwrap();
        log.append(&summary(20)).unwrap();

        let contents = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(contents.lines().count(), 3);
        assert!(contents.starts_with("date,name,tier,duration,words,accuracy,kpm,cpm,score"));
        assert_eq!(contents.matches("date,name").count(), 1);
    }

    #[test]
    fn test_records_read_back() {
        let dir = tempdir().unwrap();
        let log = SessionLog::at(dir.path().join("history.csv"));

        log.append(&summary(10)).unwrap();
        log.append(&summary(20)).unwrap();

        let records = records(&log).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].score, 20);
        assert_eq!(records[0].tier, "easy");
        assert_eq!(records[0].duration, 120);
    }

    #[test]
    fn test_records_missing_file_is_error() {
        let dir = tempdir().unwrap();
        let log = SessionLog::at(dir.path().join("absent.csv"));

        assert!(records(&log).is_err());
    }
}
