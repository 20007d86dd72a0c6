//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a throwaway config directory and
//! verify outputs.

use std::path::Path;
use std::process::{Command, Stdio};

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(config_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_interval-cli"))
        .args(args)
        .env("INTERVAL_TIMER_CONFIG_DIR", config_dir)
        .env_remove("RUST_LOG")
        .stdin(Stdio::null())
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn json_lines(stdout: &str) -> Vec<serde_json::Value> {
    stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("simulate output is JSON"))
        .collect()
}

#[test]
fn test_config_list() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "list"]);
    assert_eq!(code, 0, "Config list failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["timing"]["tick_ms"], 1000);
    assert_eq!(parsed["defaults"]["theme"], "black-white");
    assert!(dir.path().join("config.toml").exists());
}

#[test]
fn test_config_set_then_get() {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(dir.path(), &["config", "set", "defaults.repetitions", "5"]);
    assert_eq!(code, 0, "Config set failed");
    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "defaults.repetitions"]);
    assert_eq!(code, 0, "Config get failed");
    assert_eq!(stdout.trim(), "5");
}

#[test]
fn test_config_rejects_unknown_key() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["config", "set", "timing.warp", "9"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"), "{stderr}");
}

#[test]
fn test_config_path() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "path"]);
    assert_eq!(code, 0);
    assert!(stdout.trim().ends_with("config.toml"));
}

#[test]
fn test_simulate_zero_rest_workout() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(
        dir.path(),
        &["simulate", "--work", "0:02", "--rest", "0", "--reps", "2"],
    );
    assert_eq!(code, 0, "Simulate failed");
    let lines = json_lines(&stdout);
    // start line + 3 ticks per repetition
    assert_eq!(lines.len(), 1 + 6);
    assert!(lines.iter().all(|l| l["phase"] != "resting"));
    let last = lines.last().unwrap();
    assert_eq!(last["phase"], "idle");
    let completed = last["effects"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e["type"] == "completed" && e["repetitions"] == 2);
    assert!(completed);
}

#[test]
fn test_simulate_with_empty_clock_does_not_start() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["simulate", "--work", "0"]);
    assert_eq!(code, 0);
    let lines = json_lines(&stdout);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["phase"], "idle");
    assert_eq!(lines[0]["effects"].as_array().unwrap().len(), 0);
}

#[test]
fn test_simulate_rejects_bad_length() {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(dir.path(), &["simulate", "--work", "abc"]);
    assert_ne!(code, 0);
}

#[test]
fn test_run_completes_with_fast_ticks() {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(dir.path(), &["config", "set", "timing.tick_ms", "10"]);
    assert_eq!(code, 0);
    let (stdout, _, code) = run_cli(
        dir.path(),
        &["run", "--start", "--muted", "--work", "0:02", "--rest", "0:01", "--reps", "2"],
    );
    assert_eq!(code, 0, "Run failed");
    assert!(stdout.contains("Rest period"), "{stdout}");
    assert!(stdout.contains("Starting repetition 2 of 2"), "{stdout}");
    assert!(stdout.contains("Workout completed"), "{stdout}");
}

#[test]
fn test_run_exits_when_stdin_closes_on_idle_timer() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["run", "--work", "0:05"]);
    assert_eq!(code, 0, "Run did not exit cleanly");
    assert!(stdout.contains("idle"), "{stdout}");
    assert!(!stdout.contains("Workout completed"), "{stdout}");
}

#[test]
fn test_simulate_and_run_reject_broken_config() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.toml"), "defaults = [[[").unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["simulate", "--work", "0:02"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"), "{stderr}");
    let (_, stderr, code) = run_cli(dir.path(), &["run", "--work", "0:02"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"), "{stderr}");
}

#[test]
fn test_completions() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("interval-cli"));
}
