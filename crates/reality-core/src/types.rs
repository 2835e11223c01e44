use crate::error::RealityError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Source names
// ---------------------------------------------------------------------------

/// Well-known source checker names. The set is open (new checkers may
/// register under any name); these are the ones the standard registry ships
/// and the mode subsets refer to.
pub mod source {
    pub const FILESYSTEM: &str = "filesystem";
    pub const VCS: &str = "vcs";
    pub const DATABASE: &str = "database";
    pub const DEPLOYMENT: &str = "deployment";
    pub const INTEGRATION: &str = "integration";
    pub const TASK_TRACKER: &str = "task-tracker";
}

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// Which subset of checkers a run covers, and its time budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Minimal smoke test: filesystem only.
    Emergency,
    /// Filesystem + integration + database-if-configured.
    Quick,
    /// Every registered checker.
    Full,
}

impl Mode {
    /// Upper bound on wall-clock time for the whole run. A probe still
    /// outstanding at this deadline is scored as timed out.
    pub fn total_budget(self) -> Duration {
        match self {
            Mode::Emergency => Duration::from_secs(10),
            Mode::Quick => Duration::from_secs(30),
            Mode::Full => Duration::from_secs(240),
        }
    }

    /// Budget handed to each individual probe.
    pub fn probe_budget(self) -> Duration {
        match self {
            Mode::Emergency => Duration::from_secs(8),
            Mode::Quick => Duration::from_secs(10),
            Mode::Full => Duration::from_secs(60),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Emergency => "emergency",
            Mode::Quick => "quick",
            Mode::Full => "full",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = RealityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "emergency" => Ok(Mode::Emergency),
            "quick" => Ok(Mode::Quick),
            "full" => Ok(Mode::Full),
            other => Err(RealityError::InvalidMode(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Readiness tier derived from the consensus score. Thresholds are fixed
/// policy: READY >= 80, CAUTION 60-79, BLOCKED < 60.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Ready,
    Caution,
    Blocked,
}

impl Status {
    pub fn from_score(score: u32) -> Self {
        if score >= 80 {
            Status::Ready
        } else if score >= 60 {
            Status::Caution
        } else {
            Status::Blocked
        }
    }

    /// Whether downstream work may proceed. CAUTION proceeds with a warning;
    /// only BLOCKED gates.
    pub fn proceed(self) -> bool {
        !matches!(self, Status::Blocked)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Ready => "READY",
            Status::Caution => "CAUTION",
            Status::Blocked => "BLOCKED",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_thresholds_are_exact() {
        assert_eq!(Status::from_score(100), Status::Ready);
        assert_eq!(Status::from_score(80), Status::Ready);
        assert_eq!(Status::from_score(79), Status::Caution);
        assert_eq!(Status::from_score(60), Status::Caution);
        assert_eq!(Status::from_score(59), Status::Blocked);
        assert_eq!(Status::from_score(0), Status::Blocked);
    }

    #[test]
    fn only_blocked_gates() {
        assert!(Status::Ready.proceed());
        assert!(Status::Caution.proceed());
        assert!(!Status::Blocked.proceed());
    }

    #[test]
    fn mode_parse_roundtrip() {
        for mode in [Mode::Emergency, Mode::Quick, Mode::Full] {
            let parsed: Mode = mode.as_str().parse().unwrap();
            assert_eq!(parsed, mode);
        }
        assert!("turbo".parse::<Mode>().is_err());
    }

    #[test]
    fn mode_serde_snake_case() {
        let json = serde_json::to_string(&Mode::Quick).unwrap();
        assert_eq!(json, "\"quick\"");
        let parsed: Mode = serde_json::from_str("\"emergency\"").unwrap();
        assert_eq!(parsed, Mode::Emergency);
    }

    #[test]
    fn budgets_tighten_with_urgency() {
        assert!(Mode::Emergency.total_budget() < Mode::Quick.total_budget());
        assert!(Mode::Quick.total_budget() < Mode::Full.total_budget());
    }
}
