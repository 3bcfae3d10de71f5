//! Integration tests for `vaultplan render`.

#![allow(clippy::expect_used)]

use predicates::prelude::*;

use crate::cli_tests::{DEBIAN_FACTS, fixture, vaultplan};

const SIMPLE_STATE: &str = r#"
storage:
  file:
    path: /data/vault
listener:
  tcp:
    address: 127.0.0.1:8200
    tls_disable: 1
"#;

#[test]
fn test_render_config_prints_document_verbatim() {
    let dir = tempfile::tempdir().expect("tempdir");
    let facts = fixture(&dir, "facts.yaml", DEBIAN_FACTS);
    let state = fixture(&dir, "node.yaml", SIMPLE_STATE);
    let output = vaultplan()
        .args(["render", "config", "--facts", &facts, "--state", &state])
        .output()
        .expect("run");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.ends_with("}\n"));
    let value: serde_json::Value = serde_json::from_str(&stdout).expect("json");
    assert_eq!(
        value,
        serde_json::json!({
            "storage": {"file": {"path": "/data/vault"}},
            "listener": {"tcp": {"address": "127.0.0.1:8200", "tls_disable": 1}}
        })
    );
}

#[test]
fn test_render_service_unit() {
    let dir = tempfile::tempdir().expect("tempdir");
    let facts = fixture(&dir, "facts.yaml", DEBIAN_FACTS);
    let state = fixture(
        &dir,
        "node.yaml",
        "num_procs: 8\nuser: root\ngroup: admin\nbin_dir: /opt/bin\nconfig_dir: /opt/etc/vault\nservice_options: -log-level=info\n",
    );
    vaultplan()
        .args(["render", "service", "--facts", &facts, "--state", &state])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "ExecStart=/opt/bin/vault server -config=/opt/etc/vault/config.json -log-level=info\n",
        ))
        .stdout(predicate::str::contains("Environment=GOMAXPROCS=8\n"))
        .stdout(predicate::str::contains("AmbientCapabilities=CAP_IPC_LOCK\n"));
}

#[test]
fn test_render_service_sysv_override() {
    let dir = tempfile::tempdir().expect("tempdir");
    let facts = fixture(&dir, "facts.yaml", DEBIAN_FACTS);
    vaultplan()
        .args(["render", "service", "--facts", &facts, "--service-provider", "sysv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("#!/bin/sh\n"))
        .stdout(predicate::str::contains("export GOMAXPROCS=4"));
}

#[test]
fn test_render_service_json_includes_metadata() {
    let dir = tempfile::tempdir().expect("tempdir");
    let facts = fixture(&dir, "facts.yaml", DEBIAN_FACTS);
    let output = vaultplan()
        .args(["render", "service", "--json", "--facts", &facts])
        .output()
        .expect("run");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["path"], "/etc/systemd/system/vault.service");
    assert_eq!(value["mode"], "0444");
    assert_eq!(value["owner"], "root");
    assert_eq!(value["digest"].as_str().map(str::len), Some(64));
}

#[test]
fn test_render_unmanaged_service_is_a_notice() {
    let dir = tempfile::tempdir().expect("tempdir");
    let facts = fixture(&dir, "facts.yaml", DEBIAN_FACTS);
    let state = fixture(&dir, "node.yaml", "manage_service_file: false\n");
    vaultplan()
        .args(["render", "service", "--facts", &facts, "--state", &state])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("manage_service_file"));
}

#[test]
fn test_render_is_idempotent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let facts = fixture(&dir, "facts.yaml", DEBIAN_FACTS);
    let state = fixture(&dir, "node.yaml", SIMPLE_STATE);
    let run = || {
        vaultplan()
            .args(["render", "service", "--facts", &facts, "--state", &state])
            .output()
            .expect("run")
            .stdout
    };
    assert_eq!(run(), run());
}
