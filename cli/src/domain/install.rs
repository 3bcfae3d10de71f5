//! Installation resolver — derives every path, URL and toggle fact from a
//! validated desired state.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use serde::Serialize;
use serde_json::Value;
use vaultplan_common::{DesiredState, InstallMethod, OsFamily, ServiceEnsure, ServiceProvider};

use crate::domain::error::ResolutionError;
use crate::domain::os_profile::{PackageManager, RepositoryKind};
use crate::domain::validate::ValidatedState;

// ── Constants ────────────────────────────────────────────────────────────────

pub const BINARY_NAME: &str = "vault";
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const DEFAULT_VERSION: &str = "1.12.0";
pub const DEFAULT_PACKAGE_NAME: &str = "vault";
pub const DEFAULT_PACKAGE_ENSURE: &str = "installed";
pub const DEFAULT_DOWNLOAD_URL_BASE: &str = "https://releases.example.com/vault/";
pub const DEFAULT_DOWNLOAD_EXTENSION: &str = "zip";
pub const DEFAULT_DOWNLOAD_DIR: &str = "/tmp";
pub const DEFAULT_DOWNLOAD_FILENAME: &str = "vault.zip";
pub const DEFAULT_ACCOUNT: &str = "vault";
pub const DEFAULT_CONFIG_MODE: &str = "0750";
pub const CONFIG_DIR: &str = "/etc/vault";
pub const PACKAGE_CONFIG_DIR: &str = "/etc/vault.d";
pub const INSTALL_ROOT: &str = "/opt";

// ── Resolved facts ───────────────────────────────────────────────────────────

/// POSIX file capability attached to the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CapabilityGrant {
    pub capability: &'static str,
    pub flags: &'static str,
}

impl CapabilityGrant {
    /// The grant that lets the server lock memory without running as root.
    pub const IPC_LOCK: Self = Self {
        capability: "cap_ipc_lock",
        flags: "ep",
    };

    /// `setcap`-style string, e.g. `cap_ipc_lock=ep`.
    #[must_use]
    pub fn file_capability(&self) -> String {
        format!("{}={}", self.capability, self.flags)
    }

    /// systemd capability name, e.g. `CAP_IPC_LOCK`.
    #[must_use]
    pub fn unit_name(&self) -> String {
        self.capability.to_ascii_uppercase()
    }
}

/// Tri-state toggles after defaulting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct ManagementFlags {
    pub repo: bool,
    pub user: bool,
    pub group: bool,
    pub service: bool,
    pub service_file: bool,
    pub config_file: bool,
    pub storage_dir: bool,
    pub file_capabilities: bool,
}

/// How the supervised process runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceSettings {
    pub provider: ServiceProvider,
    pub user: String,
    pub group: String,
    pub num_procs: u32,
    /// Appended verbatim to the start command.
    pub options: String,
    pub enable: bool,
    pub ensure: ServiceEnsure,
}

/// Everything the other components need to know about the installation.
///
/// Immutable once resolved; only [`resolve_installation`] builds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallationPlan {
    os_family: OsFamily,
    method: InstallMethod,
    version: String,
    package_name: String,
    package_ensure: String,
    package_manager: Option<PackageManager>,
    download_url: Option<String>,
    archive_extension: String,
    download_path: Option<String>,
    install_dir: Option<String>,
    bin_dir: String,
    binary_path: String,
    config_dir: String,
    config_path: String,
    config_mode: String,
    storage_dir: Option<String>,
    repository: Option<RepositoryKind>,
    capability_grant: Option<CapabilityGrant>,
    baseline_capability: &'static str,
    service: ServiceSettings,
    flags: ManagementFlags,
}

impl InstallationPlan {
    #[must_use]
    pub fn os_family(&self) -> OsFamily {
        self.os_family
    }
    #[must_use]
    pub fn method(&self) -> InstallMethod {
        self.method
    }
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }
    #[must_use]
    pub fn package_name(&self) -> &str {
        &self.package_name
    }
    #[must_use]
    pub fn package_ensure(&self) -> &str {
        &self.package_ensure
    }
    /// Package provider; set only for repo installs.
    #[must_use]
    pub fn package_manager(&self) -> Option<PackageManager> {
        self.package_manager
    }
    /// Archive source; `None` unless an archive is downloaded.
    #[must_use]
    pub fn download_url(&self) -> Option<&str> {
        self.download_url.as_deref()
    }
    /// Where the fetched archive is stored before extraction.
    #[must_use]
    pub fn download_path(&self) -> Option<&str> {
        self.download_path.as_deref()
    }
    /// Version-qualified extraction directory.
    #[must_use]
    pub fn install_dir(&self) -> Option<&str> {
        self.install_dir.as_deref()
    }
    #[must_use]
    pub fn binary_path(&self) -> &str {
        &self.binary_path
    }
    #[must_use]
    pub fn config_dir(&self) -> &str {
        &self.config_dir
    }
    #[must_use]
    pub fn config_path(&self) -> &str {
        &self.config_path
    }
    #[must_use]
    pub fn config_mode(&self) -> &str {
        &self.config_mode
    }
    #[must_use]
    pub fn storage_dir(&self) -> Option<&str> {
        self.storage_dir.as_deref()
    }
    #[must_use]
    pub fn repository(&self) -> Option<RepositoryKind> {
        self.repository
    }
    #[must_use]
    pub fn capability_grant(&self) -> Option<CapabilityGrant> {
        self.capability_grant
    }
    #[must_use]
    pub fn capability_grant_applicable(&self) -> bool {
        self.capability_grant.is_some()
    }
    #[must_use]
    pub fn baseline_capability(&self) -> &'static str {
        self.baseline_capability
    }
    #[must_use]
    pub fn service(&self) -> &ServiceSettings {
        &self.service
    }
    #[must_use]
    pub fn flags(&self) -> ManagementFlags {
        self.flags
    }
}

// ── Resolution ───────────────────────────────────────────────────────────────

/// Resolve the installation plan for a validated desired state.
///
/// # Errors
///
/// Returns a [`ResolutionError`] when a required fact has no applicable
/// default for the chosen install method.
pub fn resolve_installation(state: &ValidatedState) -> Result<InstallationPlan, ResolutionError> {
    let desired = state.desired();
    let facts = state.facts();
    let profile = state.profile();
    let method = state.method();

    let version = desired
        .version
        .clone()
        .unwrap_or_else(|| DEFAULT_VERSION.to_string());
    let package_name = desired
        .package_name
        .clone()
        .unwrap_or_else(|| DEFAULT_PACKAGE_NAME.to_string());
    let archive_extension = desired
        .download_extension
        .clone()
        .unwrap_or_else(|| DEFAULT_DOWNLOAD_EXTENSION.to_string());

    let bin_dir = desired
        .bin_dir
        .clone()
        .unwrap_or_else(|| profile.bin_dir_for(method).to_string());
    let binary_path = join(&bin_dir, BINARY_NAME);

    let download_url = if method.downloads_archive() {
        Some(download_url(desired, method, &version, &package_name, &archive_extension, facts)?)
    } else {
        None
    };
    let (download_path, install_dir) = if download_url.is_some() {
        let dir = desired.download_dir.as_deref().unwrap_or(DEFAULT_DOWNLOAD_DIR);
        let file = desired
            .download_filename
            .as_deref()
            .unwrap_or(DEFAULT_DOWNLOAD_FILENAME);
        (
            Some(join(dir, file)),
            Some(format!("{INSTALL_ROOT}/{BINARY_NAME}-{version}")),
        )
    } else {
        (None, None)
    };

    let config_dir = desired.config_dir.clone().unwrap_or_else(|| {
        if state.manage_repo() {
            PACKAGE_CONFIG_DIR.to_string()
        } else {
            CONFIG_DIR.to_string()
        }
    });
    let config_path = join(&config_dir, CONFIG_FILE_NAME);

    let flags = ManagementFlags {
        repo: state.manage_repo(),
        user: desired.manage_user.unwrap_or(true),
        group: desired.manage_group.unwrap_or(true),
        service: desired.manage_service.unwrap_or(true),
        service_file: desired.manage_service_file.unwrap_or(method.owns_binary()),
        config_file: desired.manage_config_file.unwrap_or(true),
        storage_dir: desired.manage_storage_dir.unwrap_or(false),
        file_capabilities: desired
            .manage_file_capabilities
            .unwrap_or(method.owns_binary()),
    };

    let capability_grant = (flags.file_capabilities && !desired.mlock_disabled())
        .then_some(CapabilityGrant::IPC_LOCK);

    let storage_dir = if flags.storage_dir {
        Some(storage_path(desired).ok_or(ResolutionError::MissingStoragePath)?)
    } else {
        None
    };

    let num_procs = match desired.num_procs {
        Some(n) => n,
        None if facts.processor_count > 0 => facts.processor_count,
        None => {
            return Err(ResolutionError::MissingProcessorCount {
                os_family: facts.os_family,
            });
        }
    };

    let provider = desired
        .service_provider
        .or(facts.service_provider)
        .unwrap_or_else(|| profile.service_provider_for(facts.os_release_major));

    tracing::debug!(
        %method,
        bin_dir = %bin_dir,
        config_dir = %config_dir,
        %provider,
        capability = capability_grant.is_some(),
        service_file = flags.service_file,
        "installation resolved"
    );

    Ok(InstallationPlan {
        os_family: facts.os_family,
        method,
        version,
        package_name,
        package_ensure: desired
            .package_ensure
            .clone()
            .unwrap_or_else(|| DEFAULT_PACKAGE_ENSURE.to_string()),
        package_manager: if method == InstallMethod::Repo {
            profile.package_manager
        } else {
            None
        },
        download_url,
        archive_extension,
        download_path,
        install_dir,
        bin_dir,
        binary_path,
        config_dir,
        config_path,
        config_mode: desired
            .config_mode
            .clone()
            .unwrap_or_else(|| DEFAULT_CONFIG_MODE.to_string()),
        storage_dir,
        repository: if flags.repo { profile.repository } else { None },
        capability_grant,
        baseline_capability: profile.baseline_capability,
        service: ServiceSettings {
            provider,
            user: desired
                .user
                .clone()
                .unwrap_or_else(|| DEFAULT_ACCOUNT.to_string()),
            group: desired
                .group
                .clone()
                .unwrap_or_else(|| DEFAULT_ACCOUNT.to_string()),
            num_procs,
            options: desired.service_options.clone().unwrap_or_default(),
            enable: desired.service_enable.unwrap_or(true),
            ensure: desired.service_ensure.unwrap_or_default(),
        },
        flags,
    })
}

/// Explicit `download_url` wins; otherwise the release template is filled in.
fn download_url(
    desired: &DesiredState,
    method: InstallMethod,
    version: &str,
    package_name: &str,
    extension: &str,
    facts: &vaultplan_common::NodeFacts,
) -> Result<String, ResolutionError> {
    if let Some(url) = &desired.download_url {
        if desired.download_url_base.is_some()
            || desired.package_name.is_some()
            || desired.download_extension.is_some()
        {
            tracing::warn!("download_url is set; download_url_base, package_name and download_extension are ignored for the archive source");
        }
        return Ok(url.clone());
    }
    if method == InstallMethod::DownloadUrl {
        return Err(ResolutionError::MissingDownloadUrl { method });
    }
    let base = desired
        .download_url_base
        .as_deref()
        .unwrap_or(DEFAULT_DOWNLOAD_URL_BASE)
        .trim_end_matches('/');
    let os = url_os(&facts.kernel);
    let arch = url_arch(&facts.architecture);
    Ok(format!(
        "{base}/{version}/{package_name}_{version}_{os}_{arch}.{extension}"
    ))
}

/// Kernel token used in release file names.
#[must_use]
pub fn url_os(kernel: &str) -> String {
    kernel.to_ascii_lowercase()
}

/// Architecture token used in release file names.
#[must_use]
pub fn url_arch(architecture: &str) -> String {
    match architecture.to_ascii_lowercase().as_str() {
        "x86_64" | "amd64" => "amd64".to_string(),
        "aarch64" | "arm64" => "arm64".to_string(),
        "i386" | "i686" | "x86" => "386".to_string(),
        "armv7l" | "armhf" | "arm" => "arm".to_string(),
        other => other.to_string(),
    }
}

/// Path of a `file` or `raft` storage backend, if one is configured.
fn storage_path(desired: &DesiredState) -> Option<String> {
    let storage = desired.storage.as_ref()?;
    ["file", "raft"]
        .iter()
        .filter_map(|backend| storage.get(*backend))
        .filter_map(|backend| backend.get("path").and_then(Value::as_str))
        .next()
        .map(str::to_string)
}

fn join(dir: &str, name: &str) -> String {
    format!("{}/{name}", dir.trim_end_matches('/'))
}

// ── Unit tests ───────────────────────────────────────────────────────────────
