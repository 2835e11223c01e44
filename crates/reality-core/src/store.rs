//! Persistence of consensus reports.
//!
//! Layout under `<root>/.reality/`:
//! - `latest.json` — the most recent full report, atomically overwritten.
//! - `history.jsonl` — append-only compact summary records, never rewritten.
//! - `baselines/<date>.json` — full snapshot of the first report of each
//!   calendar day, immutable once written.

use crate::error::Result;
use crate::io;
use crate::paths;
use crate::report::{ConsensusReport, HistoryEntry};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

pub struct ReportStore {
    root: PathBuf,
}

impl ReportStore {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// Persist a finished report: overwrite latest, append one history line,
    /// and capture the day's baseline if this is the first run of the day.
    pub fn record(&self, report: &ConsensusReport) -> Result<()> {
        let full = serde_json::to_string_pretty(report)?;
        io::atomic_write(&paths::latest_path(&self.root), full.as_bytes())?;

        let entry = HistoryEntry::from(report);
        let line = serde_json::to_string(&entry)?;
        io::append_text(&paths::history_path(&self.root), &format!("{line}\n"))?;

        let date = report.timestamp.date_naive();
        io::write_if_missing(&paths::baseline_path(&self.root, date), full.as_bytes())?;
        Ok(())
    }

    pub fn latest(&self) -> Result<Option<ConsensusReport>> {
        let path = paths::latest_path(&self.root);
        if !path.exists() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&data)?))
    }

    /// All history entries, oldest first. Malformed lines are skipped rather
    /// than failing the read; the log must stay usable even if one write
    /// was interrupted.
    pub fn history(&self) -> Result<Vec<HistoryEntry>> {
        let path = paths::history_path(&self.root);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let data = std::fs::read_to_string(&path)?;
        Ok(data
            .lines()
            .filter(|l| !l.trim().is_empty())
            .filter_map(|l| serde_json::from_str(l).ok())
            .collect())
    }

    pub fn baseline(&self, date: NaiveDate) -> Result<Option<ConsensusReport>> {
        let path = paths::baseline_path(&self.root, date);
        if !path.exists() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&data)?))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::SourceCheckResult;
    use crate::types::{Mode, Status};
    use chrono::Utc;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn report(score: u32) -> ConsensusReport {
        ConsensusReport {
            timestamp: Utc::now(),
            mode: Mode::Quick,
            results: vec![SourceCheckResult::observed(
                "filesystem",
                1.0,
                BTreeMap::new(),
            )],
            skipped: vec![],
            consensus_score: score,
            status: Status::from_score(score),
            reason: None,
            conflicts: vec![],
        }
    }

    #[test]
    fn record_then_latest_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = ReportStore::new(dir.path());
        store.record(&report(100)).unwrap();

        let loaded = store.latest().unwrap().unwrap();
        assert_eq!(loaded.consensus_score, 100);
        assert_eq!(loaded.status, Status::Ready);
    }

    #[test]
    fn latest_is_overwritten_each_run() {
        let dir = TempDir::new().unwrap();
        let store = ReportStore::new(dir.path());
        store.record(&report(100)).unwrap();
        store.record(&report(50)).unwrap();

        let loaded = store.latest().unwrap().unwrap();
        assert_eq!(loaded.consensus_score, 50);
    }

    #[test]
    fn history_appends_one_line_per_run() {
        let dir = TempDir::new().unwrap();
        let store = ReportStore::new(dir.path());
        store.record(&report(100)).unwrap();
        store.record(&report(66)).unwrap();
        store.record(&report(42)).unwrap();

        let history = store.history().unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].consensus_score, 100);
        assert_eq!(history[2].consensus_score, 42);
    }

    #[test]
    fn history_survives_a_malformed_line() {
        let dir = TempDir::new().unwrap();
        let store = ReportStore::new(dir.path());
        store.record(&report(100)).unwrap();
        crate::io::append_text(&paths::history_path(dir.path()), "not json\n").unwrap();
        store.record(&report(80)).unwrap();

        let history = store.history().unwrap();
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn baseline_is_first_run_of_the_day_and_immutable() {
        let dir = TempDir::new().unwrap();
        let store = ReportStore::new(dir.path());

        let first = report(100);
        let date = first.timestamp.date_naive();
        store.record(&first).unwrap();
        store.record(&report(42)).unwrap();

        let baseline = store.baseline(date).unwrap().unwrap();
        assert_eq!(baseline.consensus_score, 100, "second run must not replace the baseline");

        // Latest moved on, the baseline did not.
        assert_eq!(store.latest().unwrap().unwrap().consensus_score, 42);
    }

    #[test]
    fn empty_store_reads_cleanly() {
        let dir = TempDir::new().unwrap();
        let store = ReportStore::new(dir.path());
        assert!(store.latest().unwrap().is_none());
        assert!(store.history().unwrap().is_empty());
        assert!(store
            .baseline(Utc::now().date_naive())
            .unwrap()
            .is_none());
    }
}
