//! `events.ndjson` — the append-only run log.
//!
//! Concurrent appends are serialized behind a process-wide mutex;
//! malformed lines are skipped rather than failing the read, matching the
//! "transient I/O / schema violation" error taxonomy.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::warn;

use super::types::{CoreEvent, EventRecord};

#[derive(Debug, thiserror::Error)]
pub enum EventLogError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("lock poisoned")]
    LockPoisoned,
}

pub type EventLogResult<T> = Result<T, EventLogError>;

/// Append-only NDJSON event log for a single `runs/<run_id>/events.ndjson`.
pub struct RunEventLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl RunEventLog {
    /// Open (creating if absent) the NDJSON file at `path` for appending.
    pub fn open(path: impl AsRef<Path>) -> EventLogResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one event as a single NDJSON line.
    pub fn append(&self, step: u64, event: &CoreEvent) -> EventLogResult<()> {
        let record = EventRecord {
            ts: event.timestamp(),
            step,
            event: event.clone(),
        };
        let mut line = serde_json::to_string(&record)?;
        line.push('\n');

        let mut file = self.file.lock().map_err(|_| EventLogError::LockPoisoned)?;
        file.write_all(line.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    /// Read all well-formed records, skipping malformed lines with a warning.
    pub fn read_all(&self) -> EventLogResult<Vec<EventRecord>> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut out = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<EventRecord>(&line) {
                Ok(record) => out.push(record),
                Err(e) => warn!(line = idx, error = %e, "skipping malformed event record"),
            }
        }
        Ok(out)
    }
}

/// Digest object produced on every state query.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Digest {
    pub step: u64,
    pub phase: String,
    pub tickets_completed: u32,
    pub tickets_failed: u32,
    pub budget_remaining: u64,
    pub ticket_budget_remaining: u64,
    pub spindle_risk: SpindleRisk,
    pub time_remaining_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpindleRisk {
    None,
    Low,
    Medium,
    High,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn event() -> CoreEvent {
        CoreEvent::SessionStart {
            session_id: "s1".into(),
            run_id: "r1".into(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn append_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.ndjson");
        let log = RunEventLog::open(&path).unwrap();
        log.append(0, &event()).unwrap();
        log.append(1, &event()).unwrap();

        let records = log.read_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].step, 1);
    }

    #[test]
    fn malformed_lines_are_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.ndjson");
        {
            let mut f = std::fs::File::create(&path).unwrap();
            writeln!(f, "{{not json").unwrap();
            writeln!(
                f,
                "{}",
                serde_json::to_string(&EventRecord {
                    ts: Utc::now(),
                    step: 0,
                    event: event(),
                })
                .unwrap()
            )
            .unwrap();
        }
        let log = RunEventLog::open(&path).unwrap();
        let records = log.read_all().unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn reopening_an_existing_log_appends_rather_than_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.ndjson");
        {
            let log = RunEventLog::open(&path).unwrap();
            log.append(0, &event()).unwrap();
        }
        let log2 = RunEventLog::open(&path).unwrap();
        log2.append(1, &event()).unwrap();
        assert_eq!(log2.read_all().unwrap().len(), 2);
    }
}
