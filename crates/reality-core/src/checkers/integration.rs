use crate::checker::{SourceCheckResult, SourceChecker};
use crate::paths;
use crate::store::ReportStore;
use crate::types::source;
use serde_json::json;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Probes the audit pipeline itself: is the state directory present, does
/// the latest report still parse, how long is the history. A corrupt or
/// missing trail doesn't fail the probe; the observations are the point.
pub struct IntegrationChecker {
    root: PathBuf,
}

impl IntegrationChecker {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }
}

impl SourceChecker for IntegrationChecker {
    fn source(&self) -> &str {
        source::INTEGRATION
    }

    fn probe(&self, _budget: Duration) -> SourceCheckResult {
        let store = ReportStore::new(&self.root);
        let mut facts = BTreeMap::new();
        facts.insert(
            "state_dir_exists".to_string(),
            json!(paths::reality_dir(&self.root).is_dir()),
        );

        let mut confidence = 1.0;
        match store.latest() {
            Ok(Some(_)) => {
                facts.insert("latest_report_exists".to_string(), json!(true));
                facts.insert("latest_report_parses".to_string(), json!(true));
            }
            Ok(None) => {
                facts.insert("latest_report_exists".to_string(), json!(false));
            }
            Err(_) => {
                facts.insert("latest_report_exists".to_string(), json!(true));
                facts.insert("latest_report_parses".to_string(), json!(false));
                confidence = 0.6;
            }
        }

        let history_entries = store.history().map(|h| h.len()).unwrap_or(0);
        facts.insert("history_entries".to_string(), json!(history_entries));

        SourceCheckResult::observed(source::INTEGRATION, confidence, facts)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io;
    use tempfile::TempDir;

    fn budget() -> Duration {
        Duration::from_secs(5)
    }

    #[test]
    fn fresh_root_reports_no_trail() {
        let dir = TempDir::new().unwrap();
        let result = IntegrationChecker::new(dir.path()).probe(budget());
        assert!(result.available);
        assert_eq!(result.facts["state_dir_exists"], json!(false));
        assert_eq!(result.facts["latest_report_exists"], json!(false));
        assert_eq!(result.facts["history_entries"], json!(0));
    }

    #[test]
    fn corrupt_latest_report_lowers_confidence() {
        let dir = TempDir::new().unwrap();
        io::atomic_write(&paths::latest_path(dir.path()), b"{ not json").unwrap();

        let result = IntegrationChecker::new(dir.path()).probe(budget());
        assert!(result.available);
        assert_eq!(result.facts["latest_report_parses"], json!(false));
        assert!(result.confidence < 1.0);
    }

    #[test]
    fn counts_history_entries() {
        let dir = TempDir::new().unwrap();
        let line = "{\"timestamp\":\"2026-08-06T00:00:00Z\",\"mode\":\"quick\",\"consensus_score\":100,\"status\":\"ready\"}\n";
        io::append_text(&paths::history_path(dir.path()), line).unwrap();
        io::append_text(&paths::history_path(dir.path()), line).unwrap();

        let result = IntegrationChecker::new(dir.path()).probe(budget());
        assert_eq!(result.facts["history_entries"], json!(2));
        assert_eq!(result.facts["state_dir_exists"], json!(true));
    }
}
