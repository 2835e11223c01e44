//! Trust-hierarchy conflict resolution.
//!
//! When two sources report different values for the same fact, the winner is
//! whichever source ranks highest in the configured hierarchy: a strict
//! total order, never a vote or an average. Version-control history is more
//! authoritative about "was this file committed" than a cached database read.

use crate::checker::SourceCheckResult;
use crate::error::{RealityError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// TrustHierarchy
// ---------------------------------------------------------------------------

/// Ordered ranking of sources, most trusted first. Static policy, fixed at
/// configuration time. Sources missing from the order rank strictly below
/// every listed source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustHierarchy {
    order: Vec<String>,
}

impl TrustHierarchy {
    /// An explicitly empty hierarchy is a configuration error; consensus
    /// about reality must never be accidental.
    pub fn new(order: Vec<String>) -> Result<Self> {
        if order.is_empty() {
            return Err(RealityError::EmptyTrustHierarchy);
        }
        Ok(Self { order })
    }

    /// Default policy: version control over filesystem over database over
    /// deployment over the derived sources.
    pub fn default_policy() -> Self {
        Self {
            order: [
                crate::types::source::VCS,
                crate::types::source::FILESYSTEM,
                crate::types::source::DATABASE,
                crate::types::source::DEPLOYMENT,
                crate::types::source::INTEGRATION,
                crate::types::source::TASK_TRACKER,
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }

    /// The configured ordering when `REALITY_TRUST_ORDER` is set, the
    /// default policy otherwise.
    pub fn from_config(config: &crate::config::EnvConfig) -> Result<Self> {
        match &config.trust_order {
            Some(order) => Self::new(order.clone()),
            None => Ok(Self::default_policy()),
        }
    }

    /// Rank of a source: 0 is most trusted. Unlisted sources all share the
    /// rank one past the end, i.e. least trusted.
    pub fn rank(&self, source: &str) -> usize {
        self.order
            .iter()
            .position(|s| s == source)
            .unwrap_or(self.order.len())
    }

    pub fn order(&self) -> &[String] {
        &self.order
    }
}

// ---------------------------------------------------------------------------
// Conflict
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conflict {
    pub fact_key: String,
    /// source name -> the value that source reported.
    pub candidate_values: BTreeMap<String, serde_json::Value>,
    pub resolved_value: serde_json::Value,
    pub resolution_reason: String,
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Detect and resolve disagreements across one run's results.
///
/// Facts are grouped by key over the available results; any key with more
/// than one distinct value becomes a `Conflict` resolved in favor of the
/// highest-ranked contributing source. Ties between unlisted sources break
/// lexicographically so resolution stays deterministic.
pub fn resolve_conflicts(
    results: &[SourceCheckResult],
    hierarchy: &TrustHierarchy,
) -> Result<Vec<Conflict>> {
    if hierarchy.order().is_empty() {
        return Err(RealityError::EmptyTrustHierarchy);
    }

    // fact key -> (source -> value). Unavailable results carry no facts by
    // invariant, so iterating everything is safe.
    let mut by_key: BTreeMap<&str, BTreeMap<&str, &serde_json::Value>> = BTreeMap::new();
    for result in results {
        for (key, value) in &result.facts {
            by_key
                .entry(key.as_str())
                .or_default()
                .insert(result.source_name.as_str(), value);
        }
    }

    let mut conflicts = Vec::new();
    for (key, candidates) in by_key {
        if candidates.len() < 2 {
            continue;
        }
        let Some(first) = candidates.values().next() else {
            continue;
        };
        if candidates.values().all(|v| v == first) {
            continue;
        }

        let Some((winner, value)) = candidates
            .iter()
            .min_by_key(|(source, _)| (hierarchy.rank(source), source.to_string()))
        else {
            continue;
        };

        let losers: Vec<&str> = candidates
            .keys()
            .filter(|s| *s != winner)
            .copied()
            .collect();
        let reason = format!(
            "`{}` outranks {} per configured trust hierarchy",
            winner,
            losers
                .iter()
                .map(|s| format!("`{s}`"))
                .collect::<Vec<_>>()
                .join(", ")
        );

        conflicts.push(Conflict {
            fact_key: key.to_string(),
            candidate_values: candidates
                .iter()
                .map(|(s, v)| (s.to_string(), (*v).clone()))
                .collect(),
            resolved_value: (*value).clone(),
            resolution_reason: reason,
        });
    }

    Ok(conflicts)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
