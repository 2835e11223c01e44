use crate::cmd::check::print_summary;
use crate::output::print_json;
use anyhow::Context;
use reality_core::store::ReportStore;
use std::path::Path;

/// Show the latest persisted report. Informational only: always exits 0
/// when the store is readable.
pub fn run(root: &Path, json: bool) -> anyhow::Result<i32> {
    let store = ReportStore::new(root);
    match store.latest().context("failed to read latest report")? {
        None => {
            println!("No report recorded yet. Run `reality check` first.");
            Ok(0)
        }
        Some(report) => {
            if json {
                print_json(&report)?;
            } else {
                println!("Recorded at {}", report.timestamp.to_rfc3339());
                print_summary(&report);
            }
            Ok(0)
        }
    }
}
