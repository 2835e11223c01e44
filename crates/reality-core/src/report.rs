use crate::checker::SourceCheckResult;
use crate::conflict::Conflict;
use crate::types::{Mode, Status};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SkippedChecker
// ---------------------------------------------------------------------------

/// A checker that was never attempted because its prerequisite configuration
/// was absent. A configuration gap, not a reality-detection failure; it
/// stays out of the scoring denominator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedChecker {
    pub source_name: String,
    pub reason: String,
}

// ---------------------------------------------------------------------------
// ConsensusReport
// ---------------------------------------------------------------------------

/// The outcome of one aggregator run. Created fresh on every invocation and
/// never mutated, only superseded by a newer report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusReport {
    pub timestamp: DateTime<Utc>,
    pub mode: Mode,
    /// One result per source attempted, in selection order.
    pub results: Vec<SourceCheckResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedChecker>,
    /// floor(100 * successful / attempted). Zero when nothing was attempted.
    pub consensus_score: u32,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<Conflict>,
}

impl ConsensusReport {
    pub fn attempted(&self) -> usize {
        self.results.len()
    }

    pub fn successful(&self) -> usize {
        self.results.iter().filter(|r| r.available).count()
    }

    /// Whether the caller may proceed. CAUTION proceeds; only BLOCKED gates.
    pub fn proceed(&self) -> bool {
        self.status.proceed()
    }
}

// ---------------------------------------------------------------------------
// HistoryEntry
// ---------------------------------------------------------------------------

/// Compact per-run record appended to the immutable historical log. Shaped
/// for later trend inspection without reprocessing full reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub mode: Mode,
    pub consensus_score: u32,
    pub status: Status,
}

impl From<&ConsensusReport> for HistoryEntry {
    fn from(report: &ConsensusReport) -> Self {
        Self {
            timestamp: report.timestamp,
            mode: report.mode,
            consensus_score: report.consensus_score,
            status: report.status,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
