use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn reality(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("reality").unwrap();
    cmd.current_dir(dir.path())
        .env("REALITY_ROOT", dir.path())
        .env_remove("REALITY_DATABASE_URL")
        .env_remove("REALITY_DATABASE_KEY")
        .env_remove("REALITY_DEPLOY_URL")
        .env_remove("REALITY_TASKS_FILE")
        .env_remove("REALITY_TRUST_ORDER");
    cmd
}

// ---------------------------------------------------------------------------
// reality check
// ---------------------------------------------------------------------------

#[test]
fn emergency_check_in_a_healthy_root_is_ready() {
    let dir = TempDir::new().unwrap();
    reality(&dir)
        .args(["check", "emergency"])
        .assert()
        .success()
        .stdout(predicate::str::contains("emergency mode"))
        .stdout(predicate::str::contains("Consensus: 100%"))
        .stdout(predicate::str::contains("READY"));
}

#[test]
fn check_defaults_to_quick_mode() {
    let dir = TempDir::new().unwrap();
    reality(&dir)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("quick mode"));
}

#[test]
fn unconfigured_database_is_skipped_not_failed() {
    let dir = TempDir::new().unwrap();
    reality(&dir)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("skip"))
        .stdout(predicate::str::contains("REALITY_DATABASE_URL not set"))
        .stdout(predicate::str::contains("Consensus: 100%"));
}

#[test]
fn unreachable_database_degrades_to_caution() {
    let dir = TempDir::new().unwrap();
    reality(&dir)
        .arg("check")
        .env("REALITY_DATABASE_URL", "http://127.0.0.1:9")
        .assert()
        .success()
        .stdout(predicate::str::contains("FAIL"))
        .stdout(predicate::str::contains("Consensus: 66%"))
        .stdout(predicate::str::contains("CAUTION"));
}

#[test]
fn blocked_verdict_exits_one() {
    // Nonexistent root: filesystem fails, integration still observes, the
    // rest are unconfigured. 1/2 sources = 50% = BLOCKED.
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing");
    reality(&dir)
        .arg("check")
        .env("REALITY_ROOT", &missing)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("BLOCKED"));
}

#[test]
fn invalid_mode_is_a_hard_error_not_a_verdict() {
    let dir = TempDir::new().unwrap();
    reality(&dir)
        .args(["check", "turbo"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid mode"));
}

#[test]
fn full_mode_reports_every_configuration_gap() {
    let dir = TempDir::new().unwrap();
    let output = reality(&dir)
        .args(["check", "full"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let skips = stdout.lines().filter(|l| l.trim_start().starts_with("skip")).count();
    assert!(skips >= 3, "expected database/deployment/task-tracker gaps, got:\n{stdout}");
}

#[test]
fn json_output_is_the_full_report() {
    let dir = TempDir::new().unwrap();
    let output = reality(&dir)
        .args(["check", "emergency", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["mode"], "emergency");
    assert_eq!(report["consensus_score"], 100);
    assert_eq!(report["status"], "ready");
    assert_eq!(report["results"][0]["source_name"], "filesystem");
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[test]
fn check_persists_latest_history_and_baseline() {
    let dir = TempDir::new().unwrap();
    reality(&dir).args(["check", "emergency"]).assert().success();

    assert!(dir.path().join(".reality/latest.json").exists());
    assert!(dir.path().join(".reality/history.jsonl").exists());
    let baselines: Vec<_> = std::fs::read_dir(dir.path().join(".reality/baselines"))
        .unwrap()
        .collect();
    assert_eq!(baselines.len(), 1);
}

#[test]
fn repeated_checks_append_history_and_keep_one_baseline() {
    let dir = TempDir::new().unwrap();
    reality(&dir).args(["check", "emergency"]).assert().success();
    reality(&dir).args(["check", "emergency"]).assert().success();

    let history = std::fs::read_to_string(dir.path().join(".reality/history.jsonl")).unwrap();
    assert_eq!(history.lines().count(), 2);

    let baselines: Vec<_> = std::fs::read_dir(dir.path().join(".reality/baselines"))
        .unwrap()
        .collect();
    assert_eq!(baselines.len(), 1, "second run of the day must not add a baseline");
}

// ---------------------------------------------------------------------------
// reality status / history / sources
// ---------------------------------------------------------------------------

#[test]
fn status_before_any_run_says_so() {
    let dir = TempDir::new().unwrap();
    reality(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("No report recorded yet"));
}

#[test]
fn status_shows_the_latest_report() {
    let dir = TempDir::new().unwrap();
    reality(&dir).args(["check", "emergency"]).assert().success();
    reality(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded at"))
        .stdout(predicate::str::contains("Consensus: 100%"));
}

#[test]
fn history_lists_past_runs() {
    let dir = TempDir::new().unwrap();
    reality(&dir).args(["check", "emergency"]).assert().success();
    reality(&dir).arg("check").assert().success();

    reality(&dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("emergency"))
        .stdout(predicate::str::contains("quick"))
        .stdout(predicate::str::contains("100%"));
}

#[test]
fn sources_lists_all_six_checkers_with_state() {
    let dir = TempDir::new().unwrap();
    reality(&dir)
        .arg("sources")
        .assert()
        .success()
        .stdout(predicate::str::contains("filesystem"))
        .stdout(predicate::str::contains("vcs"))
        .stdout(predicate::str::contains("database"))
        .stdout(predicate::str::contains("deployment"))
        .stdout(predicate::str::contains("integration"))
        .stdout(predicate::str::contains("task-tracker"))
        .stdout(predicate::str::contains("gap: REALITY_DATABASE_URL not set"));
}

#[test]
fn configured_task_tracker_joins_a_full_check() {
    let dir = TempDir::new().unwrap();
    let tasks = dir.path().join("tasks.yaml");
    std::fs::write(&tasks, "- title: ship\n  done: true\n- title: verify\n").unwrap();

    reality(&dir)
        .args(["check", "full"])
        .env("REALITY_TASKS_FILE", &tasks)
        .assert()
        .success()
        .stdout(predicate::str::contains("task-tracker"));
}
