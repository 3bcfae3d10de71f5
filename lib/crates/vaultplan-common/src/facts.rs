// lib/crates/vaultplan-common/src/facts.rs

use std::fmt;

use serde::{Deserialize, Serialize};

/// Operating-system family of the target node.
///
/// Documents may use either the fact spelling (`RedHat`) or the flag
/// spelling (`redhat`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OsFamily {
    #[serde(alias = "debian")]
    #[cfg_attr(feature = "clap", value(name = "debian"))]
    Debian,
    #[serde(alias = "redhat", alias = "Redhat")]
    #[cfg_attr(feature = "clap", value(name = "redhat"))]
    RedHat,
    #[serde(alias = "archlinux")]
    #[cfg_attr(feature = "clap", value(name = "archlinux"))]
    Archlinux,
    #[serde(alias = "suse", alias = "SUSE")]
    #[cfg_attr(feature = "clap", value(name = "suse"))]
    Suse,
    /// Any family without a dedicated profile.
    #[serde(other)]
    #[cfg_attr(feature = "clap", value(name = "other"))]
    Other,
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Debian => "Debian",
            Self::RedHat => "RedHat",
            Self::Archlinux => "Archlinux",
            Self::Suse => "Suse",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// Process-supervision mechanism on the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ServiceProvider {
    Systemd,
    Sysv,
}

impl fmt::Display for ServiceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Systemd => "systemd",
            Self::Sysv => "sysv",
        })
    }
}

/// Environment facts about the target node.
///
/// Resolution is a pure function of the desired state and these facts; they
/// are gathered once by the caller and threaded through explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeFacts {
    pub os_family: OsFamily,
    /// Major release number, e.g. `7` for RHEL 7.9.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_release_major: Option<u32>,
    #[serde(default = "default_kernel")]
    pub kernel: String,
    #[serde(default = "default_architecture")]
    pub architecture: String,
    /// Number of processors available to the node; `0` means unknown.
    #[serde(default)]
    pub processor_count: u32,
    /// Detected supervision mechanism, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_provider: Option<ServiceProvider>,
}

fn default_kernel() -> String {
    "Linux".to_string()
}

fn default_architecture() -> String {
    "x86_64".to_string()
}

impl NodeFacts {
    /// Facts for a Linux/x86_64 node of the given family.
    #[must_use]
    pub fn linux(os_family: OsFamily, processor_count: u32) -> Self {
        Self {
            os_family,
            os_release_major: None,
            kernel: default_kernel(),
            architecture: default_architecture(),
            processor_count,
            service_provider: None,
        }
    }
}
