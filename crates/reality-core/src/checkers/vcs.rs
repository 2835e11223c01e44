use crate::checker::{FailureKind, SourceCheckResult, SourceChecker};
use crate::types::source;
use serde_json::json;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

/// Probes version-control state: branch, HEAD, and worktree cleanliness.
/// Version control is the most authoritative source in the default trust
/// hierarchy; git history does not lie about what was committed.
pub struct VcsChecker {
    root: PathBuf,
}

impl VcsChecker {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }
}

impl SourceChecker for VcsChecker {
    fn source(&self) -> &str {
        source::VCS
    }

    fn ready(&self) -> Result<(), String> {
        if which::which("git").is_err() {
            return Err("git not found on PATH".to_string());
        }
        if !self.root.join(".git").exists() {
            return Err(format!(
                "no .git directory under {}",
                self.root.display()
            ));
        }
        Ok(())
    }

    fn probe(&self, _budget: Duration) -> SourceCheckResult {
        let version = match run_git(&self.root, &["--version"]) {
            Ok(v) => v,
            Err(e) => return SourceCheckResult::unavailable(source::VCS, FailureKind::Error, e),
        };
        let status = match run_git(&self.root, &["status", "--porcelain"]) {
            Ok(s) => s,
            Err(e) => return SourceCheckResult::unavailable(source::VCS, FailureKind::Error, e),
        };

        let uncommitted = status.lines().filter(|l| !l.trim().is_empty()).count();
        let mut facts = BTreeMap::new();
        facts.insert("git_version".to_string(), json!(version));
        facts.insert("uncommitted_files".to_string(), json!(uncommitted));
        facts.insert("worktree_clean".to_string(), json!(uncommitted == 0));

        // Branch and HEAD are absent on a repository with no commits yet.
        if let Some(branch) = run_git(&self.root, &["branch", "--show-current"])
            .ok()
            .filter(|b| !b.is_empty())
        {
            facts.insert("branch".to_string(), json!(branch));
        }
        if let Ok(head) = run_git(&self.root, &["rev-parse", "--short", "HEAD"]) {
            facts.insert("head".to_string(), json!(head));
        }

        SourceCheckResult::observed(source::VCS, 1.0, facts)
    }
}

fn run_git(root: &Path, args: &[&str]) -> Result<String, String> {
    let output = Command::new("git")
        .arg("-C")
        .arg(root)
        .args(args)
        .output()
        .map_err(|e| format!("failed to spawn git: {e}"))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("git {} failed: {}", args.join(" "), stderr.trim()));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
