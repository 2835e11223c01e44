use chrono::NaiveDate;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const REALITY_DIR: &str = ".reality";
pub const BASELINES_DIR: &str = ".reality/baselines";

pub const LATEST_FILE: &str = ".reality/latest.json";
pub const HISTORY_FILE: &str = ".reality/history.jsonl";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn reality_dir(root: &Path) -> PathBuf {
    root.join(REALITY_DIR)
}

pub fn latest_path(root: &Path) -> PathBuf {
    root.join(LATEST_FILE)
}

pub fn history_path(root: &Path) -> PathBuf {
    root.join(HISTORY_FILE)
}

pub fn baselines_dir(root: &Path) -> PathBuf {
    root.join(BASELINES_DIR)
}

pub fn baseline_path(root: &Path, date: NaiveDate) -> PathBuf {
    baselines_dir(root).join(format!("{}.json", date.format("%Y-%m-%d")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/proj");
        assert_eq!(latest_path(root), PathBuf::from("/tmp/proj/.reality/latest.json"));
        assert_eq!(
            history_path(root),
            PathBuf::from("/tmp/proj/.reality/history.jsonl")
        );
        let date = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        assert_eq!(
            baseline_path(root, date),
            PathBuf::from("/tmp/proj/.reality/baselines/2026-08-06.json")
        );
    }
}
