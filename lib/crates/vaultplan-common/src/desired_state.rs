// lib/crates/vaultplan-common/src/desired_state.rs

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A named configuration block, e.g. `{"file": {"path": "/data/vault"}}`.
pub type Stanza = Map<String, Value>;

/// Strategy used to place the server binary on the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallMethod {
    /// OS package from a package repository.
    Repo,
    /// Release archive derived from the download URL template.
    Archive,
    /// Release archive fetched from an explicit `download_url`.
    DownloadUrl,
    /// Binary already present at the resolved binary path.
    Local,
}

impl InstallMethod {
    /// Returns `true` when the install fetches and extracts an archive.
    #[must_use]
    pub fn downloads_archive(self) -> bool {
        matches!(self, Self::Archive | Self::DownloadUrl)
    }

    /// Returns `true` when the node owns the permission bits of the binary.
    #[must_use]
    pub fn owns_binary(self) -> bool {
        !matches!(self, Self::Repo)
    }

    /// Wire name, as accepted in desired-state documents.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Repo => "repo",
            Self::Archive => "archive",
            Self::DownloadUrl => "download_url",
            Self::Local => "local",
        }
    }
}

impl fmt::Display for InstallMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Desired run state of the managed service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceEnsure {
    #[default]
    Running,
    Stopped,
}

/// One listener stanza or an ordered list of them.
///
/// The shape is kept exactly as supplied: a single map is never turned into a
/// one-element list, and list order is significant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListenerSpec {
    Many(Vec<Stanza>),
    Single(Stanza),
}

impl ListenerSpec {
    /// Convert into a JSON value with the same shape.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Many(list) => Value::Array(list.iter().cloned().map(Value::Object).collect()),
            Self::Single(map) => Value::Object(map.clone()),
        }
    }
}

/// Caller-supplied desired state for one node.
///
/// Every field is optional; `None` means "not supplied" and is resolved to a
/// default (or left out of the configuration document) downstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DesiredState {
    // ── Installation ─────────────────────────────────────────────────────────
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_method: Option<InstallMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_ensure: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url_base: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_extension: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bin_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manage_repo: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manage_file_capabilities: Option<bool>,

    // ── Accounts ─────────────────────────────────────────────────────────────
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manage_user: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manage_group: Option<bool>,

    // ── Files ────────────────────────────────────────────────────────────────
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manage_config_file: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manage_storage_dir: Option<bool>,

    // ── Service ──────────────────────────────────────────────────────────────
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manage_service: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manage_service_file: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_enable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_ensure: Option<ServiceEnsure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_options: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_provider: Option<crate::facts::ServiceProvider>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_procs: Option<u32>,

    // ── Configuration stanzas ────────────────────────────────────────────────
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<Stanza>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ha_storage: Option<Stanza>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listener: Option<ListenerSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seal: Option<Stanza>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telemetry: Option<Stanza>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_registration: Option<Stanza>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_cache: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_mlock: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_lease_ttl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_lease_ttl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_ui: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_addr: Option<String>,
    /// Free-form keys merged into the configuration document last.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_config: Option<Stanza>,
}

impl DesiredState {
    /// Returns `true` when `mlock` is explicitly disabled.
    #[must_use]
    pub fn mlock_disabled(&self) -> bool {
        self.disable_mlock == Some(true)
    }
}
