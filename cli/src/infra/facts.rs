//! Infrastructure implementations of the `FactSource` port.
//!
//! `HostFacts` probes the machine the tool runs on; `FactsFile` reads a
//! facts document so a plan can be resolved for any other node.

use std::path::PathBuf;

use anyhow::{Context, Result};
use vaultplan_common::{NodeFacts, OsFamily, ServiceProvider};

use crate::application::ports::FactSource;
use crate::infra::desired_state::parse_document;

const OS_RELEASE: &str = "/etc/os-release";
const SYSTEMD_RUNTIME_DIR: &str = "/run/systemd/system";

/// Facts detected from the local host.
pub struct HostFacts {
    os_release: PathBuf,
    systemd_dir: PathBuf,
}

impl Default for HostFacts {
    fn default() -> Self {
        Self {
            os_release: PathBuf::from(OS_RELEASE),
            systemd_dir: PathBuf::from(SYSTEMD_RUNTIME_DIR),
        }
    }
}

impl HostFacts {
    /// Probe explicit paths instead of the system ones (used in tests).
    #[must_use]
    pub fn with_paths(os_release: PathBuf, systemd_dir: PathBuf) -> Self {
        Self {
            os_release,
            systemd_dir,
        }
    }
}

impl FactSource for HostFacts {
    fn facts(&self) -> Result<NodeFacts> {
        let (os_family, os_release_major) = match std::fs::read_to_string(&self.os_release) {
            Ok(content) => parse_os_release(&content),
            Err(e) => {
                tracing::warn!(
                    path = %self.os_release.display(),
                    error = %e,
                    "cannot read os-release, assuming an unprofiled family"
                );
                (OsFamily::Other, None)
            }
        };

        let processor_count = std::thread::available_parallelism()
            .map(|n| u32::try_from(n.get()).unwrap_or(u32::MAX))
            .unwrap_or(0);

        let service_provider = self
            .systemd_dir
            .is_dir()
            .then_some(ServiceProvider::Systemd);

        Ok(NodeFacts {
            os_family,
            os_release_major,
            kernel: kernel_name(std::env::consts::OS),
            architecture: std::env::consts::ARCH.to_string(),
            processor_count,
            service_provider,
        })
    }
}

/// Facts read from a YAML or JSON document.
pub struct FactsFile {
    path: PathBuf,
}

impl FactsFile {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl FactSource for FactsFile {
    fn facts(&self) -> Result<NodeFacts> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("cannot read {}", self.path.display()))?;
        let facts: NodeFacts = parse_document(&self.path, &content)
            .with_context(|| format!("cannot parse {}", self.path.display()))?;
        if facts.os_family == OsFamily::Other {
            tracing::warn!(
                path = %self.path.display(),
                "facts document names no profiled OS family, using generic defaults"
            );
        }
        Ok(facts)
    }
}

/// Either detected or file-backed facts, chosen at startup.
pub enum AnyFacts {
    Host(HostFacts),
    File(FactsFile),
}

impl AnyFacts {
    /// File-backed facts when a path is given, host detection otherwise.
    #[must_use]
    pub fn from_path(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => Self::File(FactsFile::new(path)),
            None => Self::Host(HostFacts::default()),
        }
    }
}

impl FactSource for AnyFacts {
    fn facts(&self) -> Result<NodeFacts> {
        match self {
            Self::Host(host) => host.facts(),
            Self::File(file) => file.facts(),
        }
    }
}

/// Map `/etc/os-release` content to an OS family and major release.
///
/// `ID` is tried first, then each entry of `ID_LIKE`, so derivatives land in
/// their parent family.
#[must_use]
pub fn parse_os_release(content: &str) -> (OsFamily, Option<u32>) {
    let mut id = None;
    let mut id_like = None;
    let mut version_id = None;
    for line in content.lines() {
        let Some((key, value)) = line.trim().split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
        match key {
            "ID" => id = Some(value.to_ascii_lowercase()),
            "ID_LIKE" => id_like = Some(value.to_ascii_lowercase()),
            "VERSION_ID" => version_id = Some(value.to_string()),
            _ => {}
        }
    }

    let family = id
        .iter()
        .map(String::as_str)
        .chain(id_like.iter().flat_map(|like| like.split_whitespace()))
        .map(family_for_id)
        .find(|family| *family != OsFamily::Other)
        .unwrap_or(OsFamily::Other);

    let major = version_id
        .as_deref()
        .and_then(|v| v.split('.').next())
        .and_then(|v| v.parse().ok());

    (family, major)
}

fn family_for_id(id: &str) -> OsFamily {
    match id {
        "debian" | "ubuntu" | "raspbian" | "linuxmint" => OsFamily::Debian,
        "rhel" | "centos" | "fedora" | "rocky" | "almalinux" | "amzn" | "ol" => OsFamily::RedHat,
        "arch" | "archarm" | "manjaro" => OsFamily::Archlinux,
        "sles" | "suse" => OsFamily::Suse,
        id if id.starts_with("opensuse") => OsFamily::Suse,
        _ => OsFamily::Other,
    }
}

fn kernel_name(os: &str) -> String {
    match os {
        "linux" => "Linux".to_string(),
        "macos" => "Darwin".to_string(),
        "freebsd" => "FreeBSD".to_string(),
        other => other.to_string(),
    }
}
