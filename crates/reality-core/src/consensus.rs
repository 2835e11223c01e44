//! Consensus aggregation across source checkers.
//!
//! One invocation selects the checkers for the requested mode, probes them
//! concurrently under per-probe and total wall-clock budgets, computes the
//! consensus score, and resolves any conflicting facts. Checkers that are
//! missing configuration are skipped (excluded from the denominator); probes
//! still outstanding at the total deadline are scored as timed out.

use crate::checker::{CheckerRegistry, FailureKind, SourceCheckResult, SourceChecker};
use crate::conflict::{resolve_conflicts, TrustHierarchy};
use crate::error::{RealityError, Result};
use crate::report::{ConsensusReport, SkippedChecker};
use crate::types::{Mode, Status};
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

pub const REASON_NO_CHECKERS: &str = "no checkers configured";

pub struct Aggregator {
    registry: CheckerRegistry,
    hierarchy: TrustHierarchy,
}

impl Aggregator {
    pub fn new(registry: CheckerRegistry, hierarchy: TrustHierarchy) -> Self {
        Self {
            registry,
            hierarchy,
        }
    }

    pub fn registry(&self) -> &CheckerRegistry {
        &self.registry
    }

    /// Run one consensus check. Always produces a report when the aggregator
    /// itself is well-configured; individual checker failures never surface
    /// as errors here.
    pub async fn run(&self, mode: Mode) -> Result<ConsensusReport> {
        self.run_with_budget(mode, mode.total_budget(), mode.probe_budget())
            .await
    }

    async fn run_with_budget(
        &self,
        mode: Mode,
        total_budget: Duration,
        probe_budget: Duration,
    ) -> Result<ConsensusReport> {
        // Misconfiguration of the aggregator itself is a hard stop, never a
        // BLOCKED verdict.
        if self.registry.is_empty() {
            return Err(RealityError::NoCheckersRegistered);
        }

        let mut skipped = Vec::new();
        let mut attempted: Vec<Arc<dyn SourceChecker>> = Vec::new();
        for checker in self.registry.for_mode(mode) {
            match checker.ready() {
                Ok(()) => attempted.push(checker),
                Err(reason) => {
                    tracing::info!(
                        source = checker.source(),
                        %reason,
                        "checker skipped: configuration gap"
                    );
                    skipped.push(SkippedChecker {
                        source_name: checker.source().to_string(),
                        reason,
                    });
                }
            }
        }

        if attempted.is_empty() {
            return Ok(ConsensusReport {
                timestamp: Utc::now(),
                mode,
                results: Vec::new(),
                skipped,
                consensus_score: 0,
                status: Status::Blocked,
                reason: Some(REASON_NO_CHECKERS.to_string()),
                conflicts: Vec::new(),
            });
        }

        let order: HashMap<String, usize> = attempted
            .iter()
            .enumerate()
            .map(|(i, c)| (c.source().to_string(), i))
            .collect();
        let mut pending: HashSet<String> = order.keys().cloned().collect();

        let deadline = tokio::time::Instant::now() + total_budget;
        let mut set: JoinSet<SourceCheckResult> = JoinSet::new();
        for checker in &attempted {
            set.spawn(run_probe(Arc::clone(checker), probe_budget));
        }

        let mut results: Vec<SourceCheckResult> = Vec::with_capacity(attempted.len());
        while !pending.is_empty() {
            match tokio::time::timeout_at(deadline, set.join_next()).await {
                Ok(Some(Ok(result))) => {
                    pending.remove(&result.source_name);
                    results.push(result);
                }
                Ok(Some(Err(join_err))) => {
                    tracing::warn!(error = %join_err, "probe task failed to join");
                }
                Ok(None) => break,
                Err(_elapsed) => {
                    set.abort_all();
                    for name in pending.drain() {
                        tracing::warn!(source = %name, "probe cut off: total budget exceeded");
                        results.push(SourceCheckResult::unavailable(
                            &name,
                            FailureKind::Timeout,
                            format!(
                                "outstanding at the {}s total budget for {mode} mode",
                                total_budget.as_secs()
                            ),
                        ));
                    }
                }
            }
        }
        // A probe lost to a join error still counts as attempted-and-failed.
        for name in pending.drain() {
            results.push(SourceCheckResult::unavailable(
                &name,
                FailureKind::Error,
                "probe task aborted",
            ));
        }

        results.sort_by_key(|r| order.get(&r.source_name).copied().unwrap_or(usize::MAX));

        let successful = results.iter().filter(|r| r.available).count() as u32;
        let consensus_score = 100 * successful / results.len() as u32;
        let status = Status::from_score(consensus_score);
        let conflicts = resolve_conflicts(&results, &self.hierarchy)?;

        Ok(ConsensusReport {
            timestamp: Utc::now(),
            mode,
            results,
            skipped,
            consensus_score,
            status,
            reason: None,
            conflicts,
        })
    }
}

/// Probe one checker on a blocking thread, bounded by `budget`. Panics and
/// hangs are converted into unavailable results; ordering and pending
/// tracking key off the registered source name, so it is re-stamped here.
async fn run_probe(checker: Arc<dyn SourceChecker>, budget: Duration) -> SourceCheckResult {
    let name = checker.source().to_string();
    let started = Instant::now();
    let outcome = tokio::time::timeout(
        budget,
        tokio::task::spawn_blocking(move || {
            std::panic::catch_unwind(AssertUnwindSafe(|| checker.probe(budget)))
        }),
    )
    .await;

    let mut result = match outcome {
        Ok(Ok(Ok(result))) => result,
        Ok(Ok(Err(_panic))) => {
            SourceCheckResult::unavailable(&name, FailureKind::Error, "probe panicked")
        }
        Ok(Err(join_err)) => SourceCheckResult::unavailable(
            &name,
            FailureKind::Error,
            format!("probe thread failed: {join_err}"),
        ),
        Err(_elapsed) => SourceCheckResult::unavailable(
            &name,
            FailureKind::Timeout,
            format!("probe exceeded its {}s budget", budget.as_secs()),
        ),
    };
    result.source_name = name;
    result.duration_ms = started.elapsed().as_millis() as u64;
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
