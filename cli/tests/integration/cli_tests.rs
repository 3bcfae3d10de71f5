//! Integration tests for the CLI surface: help, version, facts, errors.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

pub fn vaultplan() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("vaultplan"));
    cmd.env("NO_COLOR", "1")
        .env_remove("VAULTPLAN_STATE")
        .env_remove("VAULTPLAN_FACTS")
        .env_remove("VAULTPLAN_LOG")
        .env_remove("RUST_LOG");
    cmd
}

/// Write `content` to `name` inside `dir` and return the path as a string.
pub fn fixture(dir: &tempfile::TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("write fixture");
    path.display().to_string()
}

pub const DEBIAN_FACTS: &str = "os_family: Debian\nos_release_major: 12\nprocessor_count: 4\n";

// --- Help and version tests ---

#[test]
fn test_cli_no_args_shows_help() {
    vaultplan()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_cli_help_lists_commands() {
    vaultplan()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("resolve"))
        .stdout(predicate::str::contains("render"))
        .stdout(predicate::str::contains("facts"));
}

#[test]
fn test_version_command_shows_version() {
    vaultplan()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("vaultplan 0.1.0"));
}

#[test]
fn test_no_color_env_accepts_any_value() {
    for value in ["1", "yes", "true", ""] {
        vaultplan()
            .env("NO_COLOR", value)
            .arg("version")
            .assert()
            .success()
            .stdout(predicate::str::contains("vaultplan 0.1.0"));
    }
}

#[test]
fn test_no_color_flag_still_works() {
    vaultplan()
        .env_remove("NO_COLOR")
        .args(["--no-color", "version"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vaultplan 0.1.0"));
}

#[test]
fn test_version_command_json_outputs_valid_json() {
    let output = vaultplan()
        .args(["version", "--json"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["version"], "0.1.0");
}

#[test]
fn test_unknown_command_fails() {
    vaultplan()
        .arg("nonexistent")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

// --- Facts ---

#[test]
fn test_facts_from_file_with_overrides() {
    let dir = tempfile::tempdir().expect("tempdir");
    let facts = fixture(&dir, "facts.yaml", DEBIAN_FACTS);
    let output = vaultplan()
        .args(["facts", "--json", "--facts", &facts, "--processors", "16"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["os_family"], "Debian");
    assert_eq!(value["processor_count"], 16);
    assert_eq!(value["kernel"], "Linux");
}

#[test]
fn test_facts_path_from_environment() {
    let dir = tempfile::tempdir().expect("tempdir");
    let facts = fixture(&dir, "facts.json", r#"{"os_family": "Suse", "processor_count": 2}"#);
    vaultplan()
        .env("VAULTPLAN_FACTS", &facts)
        .arg("facts")
        .assert()
        .success()
        .stdout(predicate::str::contains("Suse"));
}

#[test]
fn test_unreadable_facts_file_is_io_error() {
    let output = vaultplan()
        .args(["facts", "--json", "--facts", "/nonexistent/facts.yaml"])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["error"], true);
    assert_eq!(value["code"], "io");
}
