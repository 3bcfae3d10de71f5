//! Service descriptor generation — pure functions, no I/O, no async.
//!
//! Each renderer takes the resolved [`InstallationPlan`] and returns the
//! descriptor content as a `String`. The binary and config paths come from
//! the plan, never from constants, so all three artifacts agree.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `std::fs`, `std::process`, or `std::net`.

#![allow(clippy::format_push_string)]

use serde::Serialize;
use sha2::{Digest, Sha256};
use vaultplan_common::ServiceProvider;

use crate::domain::install::{BINARY_NAME, InstallationPlan};

pub const SYSTEMD_UNIT_DIR: &str = "/etc/systemd/system";
pub const SYSV_INIT_DIR: &str = "/etc/init.d";

/// A rendered supervisor descriptor plus the file metadata it is written with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceDescriptor {
    pub provider: ServiceProvider,
    pub path: String,
    pub mode: &'static str,
    pub owner: &'static str,
    pub group: &'static str,
    pub content: String,
}

impl ServiceDescriptor {
    /// Hex SHA-256 of the content.
    #[must_use]
    pub fn digest(&self) -> String {
        content_digest(&self.content)
    }
}

/// Hex-encoded SHA-256 of an artifact's content.
#[must_use]
pub fn content_digest(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Build the descriptor for the plan's supervision mechanism.
///
/// Returns `None` when the service file is not managed. A previously written
/// descriptor is left alone in that case; removal is the applier's concern.
#[must_use]
pub fn descriptor(plan: &InstallationPlan) -> Option<ServiceDescriptor> {
    if !plan.flags().service_file {
        tracing::debug!("manage_service_file is false, no descriptor rendered");
        return None;
    }
    let provider = plan.service().provider;
    let (path, mode, content) = match provider {
        ServiceProvider::Systemd => (
            format!("{SYSTEMD_UNIT_DIR}/{BINARY_NAME}.service"),
            "0444",
            systemd_unit(plan),
        ),
        ServiceProvider::Sysv => (
            format!("{SYSV_INIT_DIR}/{BINARY_NAME}"),
            "0555",
            sysv_script(plan),
        ),
    };
    Some(ServiceDescriptor {
        provider,
        path,
        mode,
        owner: "root",
        group: "root",
        content,
    })
}

/// The start command: `<binary> server -config=<config> <options>`.
///
/// `options` is appended verbatim after a single space, so empty options
/// leave a trailing space.
#[must_use]
pub fn exec_start(plan: &InstallationPlan) -> String {
    format!(
        "{} server -config={} {}",
        plan.binary_path(),
        plan.config_path(),
        plan.service().options
    )
}

/// `CapabilityBoundingSet` value: the baseline plus the grant, if any.
#[must_use]
pub fn bounding_set(plan: &InstallationPlan) -> String {
    match plan.capability_grant() {
        Some(grant) => format!("{} {}", plan.baseline_capability(), grant.unit_name()),
        None => plan.baseline_capability().to_string(),
    }
}

/// Generate the systemd unit with capability and sandboxing directives.
///
/// Returns the unit content; nothing is written to disk.
#[must_use]
pub fn systemd_unit(plan: &InstallationPlan) -> String {
    let service = plan.service();

    let mut out = String::new();
    out.push_str(&format!("# {BINARY_NAME} systemd unit file\n"));
    out.push_str("###########################################################################\n");
    out.push_str("# Generated by vaultplan - DO NOT EDIT\n");
    out.push_str("# Local changes are overwritten on the next apply.\n");
    out.push_str("###########################################################################\n");
    out.push('\n');
    out.push_str("[Unit]\n");
    out.push_str("Description=\"HashiCorp Vault - A tool for managing secrets\"\n");
    out.push_str("Documentation=https://www.vaultproject.io/docs/\n");
    out.push_str("Requires=network-online.target\n");
    out.push_str("After=network-online.target\n");
    out.push_str(&format!("ConditionFileNotEmpty={}\n", plan.config_path()));
    out.push_str("StartLimitIntervalSec=60\n");
    out.push_str("StartLimitBurst=3\n");
    out.push('\n');
    out.push_str("[Service]\n");
    out.push_str(&format!("User={}\n", service.user));
    out.push_str(&format!("Group={}\n", service.group));
    out.push_str("ProtectSystem=full\n");
    out.push_str("ProtectHome=read-only\n");
    out.push_str("PrivateTmp=yes\n");
    out.push_str("PrivateDevices=yes\n");
    if let Some(grant) = plan.capability_grant() {
        let cap = grant.unit_name();
        out.push_str("SecureBits=keep-caps\n");
        out.push_str(&format!("AmbientCapabilities={cap}\n"));
        out.push_str(&format!("Capabilities={cap}+{}\n", grant.flags));
    }
    out.push_str(&format!("CapabilityBoundingSet={}\n", bounding_set(plan)));
    out.push_str("NoNewPrivileges=yes\n");
    out.push_str(&format!("Environment=GOMAXPROCS={}\n", service.num_procs));
    out.push_str(&format!("ExecStart={}\n", exec_start(plan)));
    out.push_str("ExecReload=/bin/kill --signal HUP $MAINPID\n");
    out.push_str("KillMode=process\n");
    out.push_str("KillSignal=SIGINT\n");
    out.push_str("Restart=on-failure\n");
    out.push_str("RestartSec=5\n");
    out.push_str("TimeoutStopSec=30\n");
    out.push_str("LimitNOFILE=65536\n");
    out.push_str("LimitMEMLOCK=infinity\n");
    out.push('\n');
    out.push_str("[Install]\n");
    out.push_str("WantedBy=multi-user.target\n");

    out
}

/// Generate a POSIX init script for hosts without systemd.
///
/// Capability directives have no equivalent here; the file capability on the
/// binary carries the grant instead.
#[must_use]
pub fn sysv_script(plan: &InstallationPlan) -> String {
    let service = plan.service();
    let args = exec_start(plan)
        .strip_prefix(plan.binary_path())
        .unwrap_or_default()
        .split_whitespace()
        .map(shell_word)
        .collect::<Vec<_>>()
        .join(" ");

    let mut out = String::new();
    out.push_str("#!/bin/sh\n");
    out.push_str(&format!("# {BINARY_NAME} init script\n"));
    out.push_str("# Generated by vaultplan - DO NOT EDIT\n");
    out.push_str("### BEGIN INIT INFO\n");
    out.push_str(&format!("# Provides:          {BINARY_NAME}\n"));
    out.push_str("# Required-Start:    $local_fs $network $remote_fs $syslog\n");
    out.push_str("# Required-Stop:     $local_fs $network $remote_fs $syslog\n");
    out.push_str("# Default-Start:     2 3 4 5\n");
    out.push_str("# Default-Stop:      0 1 6\n");
    out.push_str("# Short-Description: HashiCorp Vault secrets server\n");
    out.push_str("### END INIT INFO\n");
    out.push('\n');
    out.push_str(&format!("DAEMON={}\n", plan.binary_path()));
    out.push_str(&format!("DAEMON_ARGS=\"{}\"\n", double_quoted(&args)));
    out.push_str(&format!("CONFIG={}\n", plan.config_path()));
    out.push_str(&format!("RUN_USER={}\n", service.user));
    out.push_str(&format!("RUN_GROUP={}\n", service.group));
    out.push_str(&format!("PIDFILE=/var/run/{BINARY_NAME}.pid\n"));
    out.push_str(&format!("LOGFILE=/var/log/{BINARY_NAME}.log\n"));
    out.push_str(&format!("export GOMAXPROCS={}\n", service.num_procs));
    out.push('\n');
    out.push_str("[ -x \"$DAEMON\" ] || exit 0\n");
    out.push_str("[ -s \"$CONFIG\" ] || exit 0\n");
    out.push('\n');
    out.push_str("is_running() {\n");
    out.push_str("    [ -f \"$PIDFILE\" ] && kill -0 \"$(cat \"$PIDFILE\")\" 2>/dev/null\n");
    out.push_str("}\n");
    out.push('\n');
    out.push_str("start() {\n");
    out.push_str("    is_running && return 0\n");
    out.push_str("    touch \"$LOGFILE\" \"$PIDFILE\"\n");
    out.push_str("    chown \"$RUN_USER:$RUN_GROUP\" \"$LOGFILE\" \"$PIDFILE\"\n");
    out.push_str("    su -s /bin/sh \"$RUN_USER\" -c \"$DAEMON $DAEMON_ARGS >>$LOGFILE 2>&1 & echo \\$! >$PIDFILE\"\n");
    out.push_str("}\n");
    out.push('\n');
    out.push_str("stop() {\n");
    out.push_str("    is_running || return 0\n");
    out.push_str("    kill -INT \"$(cat \"$PIDFILE\")\"\n");
    out.push_str("    rm -f \"$PIDFILE\"\n");
    out.push_str("}\n");
    out.push('\n');
    out.push_str("case \"$1\" in\n");
    out.push_str("    start) start ;;\n");
    out.push_str("    stop) stop ;;\n");
    out.push_str("    restart) stop; sleep 1; start ;;\n");
    out.push_str("    reload) kill -HUP \"$(cat \"$PIDFILE\")\" ;;\n");
    out.push_str("    status) if is_running; then echo \"running\"; else echo \"stopped\"; exit 3; fi ;;\n");
    out.push_str("    *) echo \"Usage: $0 {start|stop|restart|reload|status}\"; exit 2 ;;\n");
    out.push_str("esac\n");

    out
}

/// Quote one argument for the shell started by `su -c`.
///
/// Words made of unreserved characters stay bare; anything else is wrapped in
/// single quotes so the shell passes it through literally.
fn shell_word(word: &str) -> String {
    let bare = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_=+:,./@%".contains(c));
    if bare {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

/// Escape text for a double-quoted assignment in the init script itself.
fn double_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '"' | '$' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

// ── Unit tests ───────────────────────────────────────────────────────────────
