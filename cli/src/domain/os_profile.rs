//! OS-family profile table.
//!
//! Every OS-family-dependent default lives here and is looked up exactly once
//! by the installation resolver. Downstream code only sees resolved facts.

use serde::Serialize;
use vaultplan_common::{InstallMethod, OsFamily, ServiceProvider};

/// Capability that stays in the bounding set regardless of any grant.
pub const BASELINE_CAPABILITY: &str = "CAP_SYSLOG";

/// OS package manager able to install the server package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageManager {
    Apt,
    Yum,
    Pacman,
    Zypper,
}

/// Third-party package repository this tool can declare for the family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RepositoryKind {
    AptSource,
    YumRepo,
}

/// Static defaults for one OS family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OsProfile {
    pub family: OsFamily,
    /// Binary directory for archive, download and local installs.
    pub bin_dir: &'static str,
    /// Binary directory the OS package installs into.
    pub package_bin_dir: &'static str,
    pub default_install_method: InstallMethod,
    pub package_manager: Option<PackageManager>,
    pub repository: Option<RepositoryKind>,
    /// First major release supervised by systemd; `None` means always systemd.
    pub systemd_since: Option<u32>,
    pub baseline_capability: &'static str,
}

const DEBIAN: OsProfile = OsProfile {
    family: OsFamily::Debian,
    bin_dir: "/usr/local/bin",
    package_bin_dir: "/usr/bin",
    default_install_method: InstallMethod::Archive,
    package_manager: Some(PackageManager::Apt),
    repository: Some(RepositoryKind::AptSource),
    systemd_since: Some(8),
    baseline_capability: BASELINE_CAPABILITY,
};

const REDHAT: OsProfile = OsProfile {
    family: OsFamily::RedHat,
    bin_dir: "/usr/local/bin",
    package_bin_dir: "/usr/bin",
    default_install_method: InstallMethod::Archive,
    package_manager: Some(PackageManager::Yum),
    repository: Some(RepositoryKind::YumRepo),
    systemd_since: Some(7),
    baseline_capability: BASELINE_CAPABILITY,
};

const ARCHLINUX: OsProfile = OsProfile {
    family: OsFamily::Archlinux,
    bin_dir: "/bin",
    package_bin_dir: "/bin",
    default_install_method: InstallMethod::Repo,
    package_manager: Some(PackageManager::Pacman),
    repository: None,
    systemd_since: None,
    baseline_capability: BASELINE_CAPABILITY,
};

const SUSE: OsProfile = OsProfile {
    family: OsFamily::Suse,
    bin_dir: "/usr/local/bin",
    package_bin_dir: "/usr/bin",
    default_install_method: InstallMethod::Archive,
    package_manager: Some(PackageManager::Zypper),
    repository: None,
    systemd_since: None,
    baseline_capability: BASELINE_CAPABILITY,
};

const OTHER: OsProfile = OsProfile {
    family: OsFamily::Other,
    bin_dir: "/usr/local/bin",
    package_bin_dir: "/usr/local/bin",
    default_install_method: InstallMethod::Archive,
    package_manager: None,
    repository: None,
    systemd_since: None,
    baseline_capability: BASELINE_CAPABILITY,
};

impl OsProfile {
    /// Look up the profile for an OS family.
    #[must_use]
    pub fn for_family(family: OsFamily) -> &'static Self {
        match family {
            OsFamily::Debian => &DEBIAN,
            OsFamily::RedHat => &REDHAT,
            OsFamily::Archlinux => &ARCHLINUX,
            OsFamily::Suse => &SUSE,
            OsFamily::Other => &OTHER,
        }
    }

    /// Default binary directory for the given install method.
    #[must_use]
    pub fn bin_dir_for(&self, method: InstallMethod) -> &'static str {
        match method {
            InstallMethod::Repo => self.package_bin_dir,
            _ => self.bin_dir,
        }
    }

    /// Supervision mechanism for a release; unknown releases get systemd.
    #[must_use]
    pub fn service_provider_for(&self, release_major: Option<u32>) -> ServiceProvider {
        match (self.systemd_since, release_major) {
            (Some(since), Some(major)) if major < since => ServiceProvider::Sysv,
            _ => ServiceProvider::Systemd,
        }
    }
}
