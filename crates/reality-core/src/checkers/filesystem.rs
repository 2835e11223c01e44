use crate::checker::{FailureKind, SourceCheckResult, SourceChecker};
use crate::paths;
use crate::types::source;
use serde_json::json;
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

// Discovery caps, matching the original connector's limits. A capped
// traversal still reports, at reduced confidence.
const MAX_DEPTH: usize = 10;
const MAX_FILES: usize = 10_000;

const SYSTEM_DIRS: &[&str] = &[".git", "node_modules", "target", "__pycache__", ".vscode"];

/// Probes the local file tree: existence, bounded file/directory counts, and
/// whether the reality state directory is present.
pub struct FileSystemChecker {
    root: PathBuf,
}

impl FileSystemChecker {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }
}

impl SourceChecker for FileSystemChecker {
    fn source(&self) -> &str {
        source::FILESYSTEM
    }

    fn probe(&self, budget: Duration) -> SourceCheckResult {
        if !self.root.exists() {
            return SourceCheckResult::unavailable(
                source::FILESYSTEM,
                FailureKind::Error,
                format!("root path does not exist: {}", self.root.display()),
            );
        }
        if !self.root.is_dir() {
            return SourceCheckResult::unavailable(
                source::FILESYSTEM,
                FailureKind::Error,
                format!("root path is not a directory: {}", self.root.display()),
            );
        }

        let mut walk = Walk {
            files: 0,
            dirs: 0,
            capped: false,
            deadline: Instant::now() + budget,
        };
        walk.visit(&self.root, 0);

        let mut facts = BTreeMap::new();
        facts.insert("root_exists".to_string(), json!(true));
        facts.insert("file_count".to_string(), json!(walk.files));
        facts.insert("directory_count".to_string(), json!(walk.dirs));
        facts.insert(
            "state_dir_exists".to_string(),
            json!(paths::reality_dir(&self.root).is_dir()),
        );
        let confidence = if walk.capped { 0.7 } else { 1.0 };
        SourceCheckResult::observed(source::FILESYSTEM, confidence, facts)
    }
}

struct Walk {
    files: usize,
    dirs: usize,
    capped: bool,
    deadline: Instant,
}

impl Walk {
    fn visit(&mut self, dir: &Path, depth: usize) {
        if depth > MAX_DEPTH || self.files >= MAX_FILES || Instant::now() >= self.deadline {
            self.capped = true;
            return;
        }
        let Ok(entries) = std::fs::read_dir(dir) else {
            // Unreadable directory: count what we can, note the gap.
            self.capped = true;
            return;
        };
        for entry in entries.flatten() {
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_dir() {
                if is_system_dir(&entry.file_name()) {
                    continue;
                }
                self.dirs += 1;
                self.visit(&entry.path(), depth + 1);
            } else if file_type.is_file() {
                self.files += 1;
                if self.files >= MAX_FILES {
                    self.capped = true;
                    return;
                }
            }
        }
    }
}

fn is_system_dir(name: &OsStr) -> bool {
    SYSTEM_DIRS.iter().any(|d| name == OsStr::new(d))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
