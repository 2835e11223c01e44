//! The source checker contract and registry.
//!
//! A checker probes exactly one truth source, read-only, and always returns a
//! well-formed result. Failures, timeouts, and missing credentials are data,
//! not exceptions: the aggregator's robustness depends on every checker being
//! total. The registry replaces per-source dispatch conditionals: new
//! checkers register an implementation without touching aggregator logic.

use crate::types::{source, Mode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

// ---------------------------------------------------------------------------
// SourceCheckResult
// ---------------------------------------------------------------------------

/// How an attempted probe failed. `Timeout` scores identically to `Error`
/// but is recorded separately so operators can tell slow systems from broken
/// ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Error,
    Timeout,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceCheckResult {
    pub source_name: String,
    /// Whether the probe ran and the source answered.
    pub available: bool,
    /// Trust in this source's answer, in [0,1]. Partial access lowers
    /// confidence even when available.
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub facts: BTreeMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_kind: Option<FailureKind>,
    /// Elapsed probe time, stamped by the aggregator.
    #[serde(default)]
    pub duration_ms: u64,
}

impl SourceCheckResult {
    /// A successful observation. Clamps confidence into [0,1].
    pub fn observed(
        source_name: impl Into<String>,
        confidence: f64,
        facts: BTreeMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            source_name: source_name.into(),
            available: true,
            confidence: confidence.clamp(0.0, 1.0),
            facts,
            error: None,
            failure_kind: None,
            duration_ms: 0,
        }
    }

    /// A failed or skipped probe. Enforces the invariant that unavailable
    /// results carry zero confidence and no facts.
    pub fn unavailable(
        source_name: impl Into<String>,
        kind: FailureKind,
        error: impl Into<String>,
    ) -> Self {
        Self {
            source_name: source_name.into(),
            available: false,
            confidence: 0.0,
            facts: BTreeMap::new(),
            error: Some(error.into()),
            failure_kind: Some(kind),
            duration_ms: 0,
        }
    }

    pub fn timed_out(&self) -> bool {
        self.failure_kind == Some(FailureKind::Timeout)
    }
}

// ---------------------------------------------------------------------------
// SourceChecker
// ---------------------------------------------------------------------------

/// One pluggable probe against one independent truth source.
///
/// Implementations must be strictly read-only on the system they probe and
/// must catch their own failures, returning `SourceCheckResult::unavailable`
/// instead of panicking or blocking forever. The aggregator adds a second
/// line of defense (catch_unwind plus a hard timeout), but a well-behaved
/// checker never relies on it.
pub trait SourceChecker: Send + Sync {
    fn source(&self) -> &str;

    /// `Err(reason)` when required configuration (credentials, paths) is
    /// absent. A non-ready checker is skipped: it does not count as
    /// attempted and never reaches `probe`.
    fn ready(&self) -> Result<(), String> {
        Ok(())
    }

    /// Probe the source. `budget` is the soft deadline the checker should
    /// pass down to network clients and traversal loops.
    fn probe(&self, budget: Duration) -> SourceCheckResult;
}

// ---------------------------------------------------------------------------
// CheckerRegistry
// ---------------------------------------------------------------------------

/// Ordered collection of registered checkers. Registration order is the
/// reporting order.
#[derive(Default, Clone)]
pub struct CheckerRegistry {
    checkers: Vec<Arc<dyn SourceChecker>>,
}

impl CheckerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a checker. A checker re-registered under an existing name
    /// replaces the earlier one in place.
    pub fn register(&mut self, checker: Arc<dyn SourceChecker>) {
        if let Some(slot) = self
            .checkers
            .iter_mut()
            .find(|c| c.source() == checker.source())
        {
            *slot = checker;
        } else {
            self.checkers.push(checker);
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn SourceChecker>> {
        self.checkers.iter().find(|c| c.source() == name).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.checkers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.checkers.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn SourceChecker>> {
        self.checkers.iter()
    }

    /// The subset of registered checkers a mode covers, in registration
    /// order. Names a mode asks for that nothing registered under are
    /// silently absent; the mode subsets are a policy over whatever is
    /// actually installed.
    pub fn for_mode(&self, mode: Mode) -> Vec<Arc<dyn SourceChecker>> {
        let wanted: Option<&[&str]> = match mode {
            Mode::Emergency => Some(&[source::FILESYSTEM]),
            Mode::Quick => Some(&[source::FILESYSTEM, source::INTEGRATION, source::DATABASE]),
            Mode::Full => None,
        };
        match wanted {
            None => self.checkers.clone(),
            Some(names) => self
                .checkers
                .iter()
                .filter(|c| names.contains(&c.source()))
                .cloned()
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
