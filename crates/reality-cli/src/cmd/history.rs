use crate::output::{print_json, print_table};
use anyhow::Context;
use reality_core::store::ReportStore;
use std::path::Path;

/// Show the most recent history entries, oldest first.
pub fn run(root: &Path, limit: usize, json: bool) -> anyhow::Result<i32> {
    let history = ReportStore::new(root)
        .history()
        .context("failed to read history")?;
    let start = history.len().saturating_sub(limit);
    let recent = &history[start..];

    if json {
        print_json(&recent)?;
        return Ok(0);
    }

    if recent.is_empty() {
        println!("No history yet. Run `reality check` first.");
        return Ok(0);
    }

    let rows: Vec<Vec<String>> = recent
        .iter()
        .map(|e| {
            vec![
                e.timestamp.to_rfc3339(),
                e.mode.to_string(),
                format!("{}%", e.consensus_score),
                e.status.to_string(),
            ]
        })
        .collect();
    print_table(&["TIMESTAMP", "MODE", "SCORE", "STATUS"], &rows);
    Ok(0)
}
