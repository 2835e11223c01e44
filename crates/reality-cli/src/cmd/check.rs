use crate::output::print_json;
use anyhow::Context;
use reality_core::checkers::standard_registry;
use reality_core::config::EnvConfig;
use reality_core::conflict::TrustHierarchy;
use reality_core::consensus::Aggregator;
use reality_core::report::ConsensusReport;
use reality_core::store::ReportStore;
use reality_core::types::{Mode, Status};
use std::path::Path;

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Run one consensus check, persist the report, print the summary, and
/// return the gate exit code: 0 for READY/CAUTION, 1 for BLOCKED.
pub fn run(root: &Path, mode: &str, json: bool) -> anyhow::Result<i32> {
    let mode: Mode = mode.parse()?;
    let config = EnvConfig::from_env();
    let registry = standard_registry(root, &config);
    let hierarchy = TrustHierarchy::from_config(&config).context("invalid trust hierarchy")?;
    let aggregator = Aggregator::new(registry, hierarchy);

    let rt = tokio::runtime::Runtime::new().context("failed to start runtime")?;
    let report = rt.block_on(aggregator.run(mode))?;

    ReportStore::new(root)
        .record(&report)
        .context("failed to persist report")?;

    if json {
        print_json(&report)?;
    } else {
        print_summary(&report);
    }
    Ok(if report.proceed() { 0 } else { 1 })
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

pub fn print_summary(report: &ConsensusReport) {
    println!("Reality check ({} mode)", report.mode);
    for r in &report.results {
        if r.available {
            println!("  ok       {:<14} {:>6}ms", r.source_name, r.duration_ms);
        } else {
            let kind = if r.timed_out() { "TIMEOUT" } else { "FAIL" };
            println!(
                "  {:<8} {:<14} {:>6}ms  {}",
                kind,
                r.source_name,
                r.duration_ms,
                r.error.as_deref().unwrap_or("unknown failure"),
            );
        }
    }
    for s in &report.skipped {
        println!("  skip     {:<14} {}", s.source_name, s.reason);
    }

    if !report.conflicts.is_empty() {
        println!();
        println!("Conflicts:");
        for c in &report.conflicts {
            println!(
                "  {} -> {} ({})",
                c.fact_key, c.resolved_value, c.resolution_reason
            );
        }
    }

    println!();
    println!(
        "Consensus: {}% ({}/{} sources)",
        report.consensus_score,
        report.successful(),
        report.attempted(),
    );
    match &report.reason {
        Some(reason) => println!("Status: {} ({reason})", report.status),
        None => println!("Status: {}", report.status),
    }
    if report.status == Status::Caution {
        println!("Proceeding is allowed, but degraded sources should be investigated.");
    }
}
