use crate::checker::{FailureKind, SourceCheckResult, SourceChecker};
use crate::config::{EnvConfig, ENV_TASKS_FILE};
use crate::types::source;
use serde_json::json;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Probes the task tracker file named by `REALITY_TASKS_FILE`: a YAML list
/// of tasks, either top-level or under a `tasks` key. A task with
/// `done: true` is closed; everything else counts as open.
pub struct TaskTrackerChecker {
    path: Option<PathBuf>,
}

impl TaskTrackerChecker {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn from_config(config: &EnvConfig) -> Self {
        Self::new(config.tasks_file.clone())
    }
}

impl SourceChecker for TaskTrackerChecker {
    fn source(&self) -> &str {
        source::TASK_TRACKER
    }

    fn ready(&self) -> Result<(), String> {
        match self.path {
            Some(_) => Ok(()),
            None => Err(format!("{ENV_TASKS_FILE} not set")),
        }
    }

    fn probe(&self, _budget: Duration) -> SourceCheckResult {
        let Some(path) = self.path.as_deref() else {
            return SourceCheckResult::unavailable(
                source::TASK_TRACKER,
                FailureKind::Error,
                format!("{ENV_TASKS_FILE} not set"),
            );
        };

        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                return SourceCheckResult::unavailable(
                    source::TASK_TRACKER,
                    FailureKind::Error,
                    format!("cannot read tasks file {}: {e}", path.display()),
                )
            }
        };

        let value: Value = match serde_yaml::from_str(&raw) {
            Ok(v) => v,
            Err(e) => {
                return SourceCheckResult::unavailable(
                    source::TASK_TRACKER,
                    FailureKind::Error,
                    format!("tasks file is not valid YAML: {e}"),
                )
            }
        };

        let Some(tasks) = task_list(&value) else {
            return SourceCheckResult::unavailable(
                source::TASK_TRACKER,
                FailureKind::Error,
                "tasks file has no task list (expected a sequence, or a `tasks` key)",
            );
        };

        let open = tasks.iter().filter(|t| !is_done(t)).count();
        let mut facts = BTreeMap::new();
        facts.insert("task_count".to_string(), json!(tasks.len()));
        facts.insert("open_tasks".to_string(), json!(open));
        SourceCheckResult::observed(source::TASK_TRACKER, 1.0, facts)
    }
}

fn task_list(value: &Value) -> Option<&Vec<Value>> {
    match value {
        Value::Sequence(seq) => Some(seq),
        Value::Mapping(map) => match map.get("tasks") {
            Some(Value::Sequence(seq)) => Some(seq),
            _ => None,
        },
        _ => None,
    }
}

fn is_done(task: &Value) -> bool {
    matches!(
        task.get("done"),
        Some(Value::Bool(true))
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
