//! Integration tests for `vaultplan resolve`.

#![allow(clippy::expect_used)]

use predicates::prelude::*;

use crate::cli_tests::{DEBIAN_FACTS, fixture, vaultplan};

#[test]
fn test_resolve_lists_resources() {
    let dir = tempfile::tempdir().expect("tempdir");
    let facts = fixture(&dir, "facts.yaml", DEBIAN_FACTS);
    let state = fixture(&dir, "node.yaml", "version: 0.7.0\n");
    vaultplan()
        .args(["resolve", "--facts", &facts, "--state", &state])
        .assert()
        .success()
        .stdout(predicate::str::contains("/usr/local/bin/vault"))
        .stdout(predicate::str::contains(
            "https://releases.example.com/vault/0.7.0/vault_0.7.0_linux_amd64.zip",
        ))
        .stdout(predicate::str::contains("/etc/systemd/system/vault.service"));
}

#[test]
fn test_resolve_json_catalog() {
    let dir = tempfile::tempdir().expect("tempdir");
    let facts = fixture(&dir, "facts.yaml", DEBIAN_FACTS);
    let state = fixture(
        &dir,
        "node.json",
        r#"{"install_method": "repo", "manage_repo": true}"#,
    );
    let output = vaultplan()
        .args(["resolve", "--json", "--facts", &facts, "--state", &state])
        .output()
        .expect("run");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["repository"]["kind"], "apt_source");
    assert_eq!(value["package"]["name"], "vault");
    assert_eq!(value["config_file"]["path"], "/etc/vault.d/config.json");
    assert!(value["archive"].is_null());
    assert!(value["service_file"].is_null());
}

#[test]
fn test_resolve_state_from_environment() {
    let dir = tempfile::tempdir().expect("tempdir");
    let facts = fixture(&dir, "facts.yaml", DEBIAN_FACTS);
    let state = fixture(&dir, "node.yaml", "bin_dir: /opt/bin\n");
    vaultplan()
        .env("VAULTPLAN_STATE", &state)
        .args(["resolve", "--facts", &facts])
        .assert()
        .success()
        .stdout(predicate::str::contains("/opt/bin/vault"));
}

#[test]
fn test_resolve_repo_on_archlinux_with_manage_repo_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let facts = fixture(&dir, "facts.yaml", DEBIAN_FACTS);
    let state = fixture(&dir, "node.yaml", "install_method: repo\nmanage_repo: true\n");
    vaultplan()
        .args(["resolve", "--facts", &facts, "--state", &state, "--os-family", "archlinux"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("manage_repo"))
        .stderr(predicate::str::contains("Archlinux"));
}

#[test]
fn test_resolve_validation_error_json_code() {
    let dir = tempfile::tempdir().expect("tempdir");
    let facts = fixture(&dir, "facts.yaml", DEBIAN_FACTS);
    let state = fixture(&dir, "node.yaml", "install_method: repo\n");
    let output = vaultplan()
        .args(["resolve", "--json", "--facts", &facts, "--state", &state])
        .args(["--os-family", "other"])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["code"], "validation");
    assert!(value["message"].as_str().unwrap_or_default().contains("install_method"));
}

#[test]
fn test_resolve_rejects_unknown_parameter() {
    let dir = tempfile::tempdir().expect("tempdir");
    let facts = fixture(&dir, "facts.yaml", DEBIAN_FACTS);
    let state = fixture(&dir, "node.yaml", "disable_mlok: true\n");
    vaultplan()
        .args(["resolve", "--facts", &facts, "--state", &state])
        .assert()
        .failure()
        .stderr(predicate::str::contains("disable_mlok"));
}

#[test]
fn test_resolve_facts_file_with_lowercase_family() {
    let dir = tempfile::tempdir().expect("tempdir");
    let facts = fixture(&dir, "facts.yaml", "os_family: debian\nprocessor_count: 2\n");
    let state = fixture(&dir, "node.yaml", "install_method: repo\n");
    let output = vaultplan()
        .args(["resolve", "--json", "--facts", &facts, "--state", &state])
        .output()
        .expect("run");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["repository"]["kind"], "apt_source");
    assert_eq!(value["binary"]["path"], "/usr/bin/vault");
}

#[test]
fn test_resolve_archlinux_simple_configuration() {
    let dir = tempfile::tempdir().expect("tempdir");
    let facts = fixture(&dir, "facts.yaml", "os_family: Archlinux\nprocessor_count: 3\n");
    let state = fixture(
        &dir,
        "node.yaml",
        "storage:\n  file:\n    path: /data/vault\nlistener:\n  tcp:\n    address: 127.0.0.1:8200\n",
    );
    let output = vaultplan()
        .args(["resolve", "--json", "--facts", &facts, "--state", &state])
        .output()
        .expect("run");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["user"]["name"], "vault");
    assert_eq!(value["group"]["name"], "vault");
    assert_eq!(value["config_file"]["path"], "/etc/vault/config.json");
    assert_eq!(value["config_file"]["owner"], "vault");
}
