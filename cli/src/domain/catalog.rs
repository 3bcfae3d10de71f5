//! Resource catalog — runs the four resolution stages in order and declares
//! one optional resource per kind.
//!
//! `None` means "do not declare", never "declare empty". The catalog only
//! describes resources; applying them is left to external appliers.

use serde::Serialize;
use vaultplan_common::{DesiredState, NodeFacts, ServiceEnsure, ServiceProvider};

use crate::domain::document::{ConfigDocument, compose};
use crate::domain::error::PlanError;
use crate::domain::install::{BINARY_NAME, InstallationPlan, resolve_installation};
use crate::domain::os_profile::{PackageManager, RepositoryKind};
use crate::domain::service::{ServiceDescriptor, content_digest, descriptor};
use crate::domain::validate::validate;

pub const REPOSITORY_NAME: &str = "HashiCorp";
pub const APT_REPOSITORY_URL: &str = "https://apt.releases.example.com";
pub const YUM_REPOSITORY_URL: &str =
    "https://rpm.releases.example.com/RHEL/$releasever/$basearch/stable";

// ── Resource types ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResource {
    pub name: String,
    pub primary_group: String,
    pub system: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupResource {
    pub name: String,
    pub system: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryResource {
    pub kind: RepositoryKind,
    pub name: &'static str,
    pub url: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageResource {
    pub name: String,
    pub ensure: String,
    pub provider: PackageManager,
}

/// Fetch-and-extract step for archive installs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveResource {
    pub path: String,
    pub source: String,
    pub extract_path: String,
    /// Marker whose presence means extraction already happened.
    pub creates: String,
    pub cleanup: bool,
    /// Copies the extracted binary into place; runs only after a fresh extract.
    pub install_command: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    File,
    Directory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileResource {
    pub path: String,
    pub kind: FileKind,
    pub owner: String,
    pub group: String,
    pub mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Remove unmanaged entries inside a directory.
    pub purge: bool,
}

impl FileResource {
    fn directory(path: &str, owner: &str, group: &str, mode: &str) -> Self {
        Self {
            path: path.to_string(),
            kind: FileKind::Directory,
            owner: owner.to_string(),
            group: group.to_string(),
            mode: mode.to_string(),
            content: None,
            purge: false,
        }
    }

    /// Hex SHA-256 of the content, for content-bearing files.
    #[must_use]
    pub fn digest(&self) -> Option<String> {
        self.content.as_deref().map(content_digest)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileCapabilityResource {
    pub path: String,
    pub capability: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceResource {
    pub name: &'static str,
    pub provider: ServiceProvider,
    pub ensure: ServiceEnsure,
    pub enable: bool,
}

/// Full desired-resource description for one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Catalog {
    pub plan: InstallationPlan,
    pub document: ConfigDocument,
    pub user: Option<UserResource>,
    pub group: Option<GroupResource>,
    pub repository: Option<RepositoryResource>,
    pub package: Option<PackageResource>,
    pub archive: Option<ArchiveResource>,
    pub install_dir: Option<FileResource>,
    pub binary: FileResource,
    pub file_capability: Option<FileCapabilityResource>,
    pub config_dir: Option<FileResource>,
    pub config_file: Option<FileResource>,
    pub storage_dir: Option<FileResource>,
    pub service_file: Option<ServiceDescriptor>,
    pub service: Option<ServiceResource>,
}

impl Catalog {
    /// `(kind, title)` for every declared resource, in apply order.
    #[must_use]
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        let mut out: Vec<(&'static str, String)> = Vec::new();
        if let Some(g) = &self.group {
            out.push(("group", g.name.clone()));
        }
        if let Some(u) = &self.user {
            out.push(("user", u.name.clone()));
        }
        if let Some(r) = &self.repository {
            out.push(("repository", r.name.to_string()));
        }
        if let Some(p) = &self.package {
            out.push(("package", p.name.clone()));
        }
        if let Some(d) = &self.install_dir {
            out.push(("directory", d.path.clone()));
        }
        if let Some(a) = &self.archive {
            out.push(("archive", a.source.clone()));
        }
        out.push(("file", self.binary.path.clone()));
        if let Some(c) = &self.file_capability {
            out.push(("file_capability", format!("{} {}", c.path, c.capability)));
        }
        if let Some(d) = &self.config_dir {
            out.push(("directory", d.path.clone()));
        }
        if let Some(f) = &self.config_file {
            out.push(("file", f.path.clone()));
        }
        if let Some(d) = &self.storage_dir {
            out.push(("directory", d.path.clone()));
        }
        if let Some(s) = &self.service_file {
            out.push(("service_file", s.path.clone()));
        }
        if let Some(s) = &self.service {
            out.push(("service", s.name.to_string()));
        }
        out
    }
}

// ── Resolution entry point ───────────────────────────────────────────────────

/// Resolve one node: validate, resolve the installation, compose the
/// configuration document and render the service descriptor.
///
/// Pure and deterministic: the same inputs always yield an identical catalog.
///
/// # Errors
///
/// Returns [`PlanError`] if validation or resolution fails; no partial catalog
/// is produced.
pub fn resolve(desired: DesiredState, facts: NodeFacts) -> Result<Catalog, PlanError> {
    let state = validate(desired, facts)?;
    let plan = resolve_installation(&state)?;
    let document = compose(state.desired());
    let service_file = descriptor(&plan);
    let flags = plan.flags();
    let service = plan.service();

    let user = flags.user.then(|| UserResource {
        name: service.user.clone(),
        primary_group: service.group.clone(),
        system: true,
    });
    let group = flags.group.then(|| GroupResource {
        name: service.group.clone(),
        system: true,
    });

    let repository = plan.repository().map(|kind| RepositoryResource {
        kind,
        name: REPOSITORY_NAME,
        url: match kind {
            RepositoryKind::AptSource => APT_REPOSITORY_URL,
            RepositoryKind::YumRepo => YUM_REPOSITORY_URL,
        },
    });

    let package = plan.package_manager().map(|provider| PackageResource {
        name: plan.package_name().to_string(),
        ensure: plan.package_ensure().to_string(),
        provider,
    });

    let archive = match (plan.download_url(), plan.download_path(), plan.install_dir()) {
        (Some(source), Some(path), Some(dir)) => Some(ArchiveResource {
            path: path.to_string(),
            source: source.to_string(),
            extract_path: dir.to_string(),
            creates: format!("{dir}/{BINARY_NAME}"),
            cleanup: true,
            install_command: format!("/bin/cp -f {dir}/{BINARY_NAME} {}", plan.binary_path()),
        }),
        _ => None,
    };
    let install_dir = plan
        .install_dir()
        .map(|dir| FileResource::directory(dir, "root", "root", "0755"));

    let binary = FileResource {
        path: plan.binary_path().to_string(),
        kind: FileKind::File,
        owner: "root".to_string(),
        group: "root".to_string(),
        mode: "0755".to_string(),
        content: None,
        purge: false,
    };

    let file_capability = plan.capability_grant().map(|grant| FileCapabilityResource {
        path: plan.binary_path().to_string(),
        capability: grant.file_capability(),
    });

    // The package owns its config dir when installed from a managed repository.
    let config_dir = (!flags.repo).then(|| FileResource {
        purge: true,
        ..FileResource::directory(plan.config_dir(), &service.user, &service.group, "0755")
    });

    let config_file = if flags.config_file {
        let content = document
            .to_json_pretty()
            .map_err(|e| PlanError::Invariant(format!("config document did not serialize: {e}")))?;
        Some(FileResource {
            path: plan.config_path().to_string(),
            kind: FileKind::File,
            owner: service.user.clone(),
            group: service.group.clone(),
            mode: plan.config_mode().to_string(),
            content: Some(content),
            purge: false,
        })
    } else {
        None
    };

    let storage_dir = plan
        .storage_dir()
        .map(|dir| FileResource::directory(dir, &service.user, &service.group, "0700"));

    let service_resource = flags.service.then(|| ServiceResource {
        name: BINARY_NAME,
        provider: service.provider,
        ensure: service.ensure,
        enable: service.enable,
    });

    tracing::info!(
        os_family = %plan.os_family(),
        method = %plan.method(),
        binary = %plan.binary_path(),
        config_keys = document.keys().count(),
        service_file = service_file.is_some(),
        "node resolved"
    );

    Ok(Catalog {
        user,
        group,
        repository,
        package,
        archive,
        install_dir,
        binary,
        file_capability,
        config_dir,
        config_file,
        storage_dir,
        service_file,
        service: service_resource,
        document,
        plan,
    })
}

// ── Unit tests ───────────────────────────────────────────────────────────────
