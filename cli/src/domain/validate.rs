//! Parameter validation — the first stage of a node resolution.
//!
//! All functions in this module are synchronous and take data in, returning
//! data out. Zero imports from `std::fs`, `crate::infra`, `crate::commands`,
//! or `crate::application`.

use std::sync::LazyLock;

use regex::Regex;
use vaultplan_common::{DesiredState, InstallMethod, NodeFacts};

use crate::domain::document::MLOCK_KEY;
use crate::domain::error::{FieldViolation, ValidationError};
use crate::domain::os_profile::OsProfile;

/// POSIX portable account names (with the optional trailing `$` Samba uses).
pub static ACCOUNT_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[a-z_][a-z0-9_-]{0,31}\$?$").expect("valid regex")
});

/// File modes written as three or four octal digits, e.g. `0750`.
pub static OCTAL_MODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[0-7]{3,4}$").expect("valid regex")
});

/// Desired state that passed validation, bound to the facts it was checked
/// against.
///
/// Only [`validate`] constructs this type, so the resolver cannot run on
/// unchecked input.
#[derive(Debug, Clone)]
pub struct ValidatedState {
    desired: DesiredState,
    facts: NodeFacts,
    profile: &'static OsProfile,
    method: InstallMethod,
    manage_repo: bool,
}

impl ValidatedState {
    #[must_use]
    pub fn desired(&self) -> &DesiredState {
        &self.desired
    }

    #[must_use]
    pub fn facts(&self) -> &NodeFacts {
        &self.facts
    }

    #[must_use]
    pub fn profile(&self) -> &'static OsProfile {
        self.profile
    }

    /// Install method after applying the OS default.
    #[must_use]
    pub fn method(&self) -> InstallMethod {
        self.method
    }

    /// Whether a package repository resource is declared.
    #[must_use]
    pub fn manage_repo(&self) -> bool {
        self.manage_repo
    }
}

/// Validate `desired` against the node `facts`.
///
/// Checks:
/// 1. repo installs need a package manager on the OS family
/// 2. explicit `manage_repo=true` on a repo install needs a managed repository
/// 3. `version` is a semantic version when an archive is downloaded
/// 4. `bin_dir`, `config_dir`, `download_dir` are absolute
/// 5. `user` / `group` are valid account names
/// 6. `config_mode` is octal
/// 7. `num_procs` is at least 1
/// 8. `service_options` is a single line
/// 9. `extra_config` does not carry `disable_mlock`
///
/// # Errors
///
/// Returns a [`ValidationError`] listing all violations if any check fails.
pub fn validate(desired: DesiredState, facts: NodeFacts) -> Result<ValidatedState, ValidationError> {
    let profile = OsProfile::for_family(facts.os_family);
    let mut violations: Vec<FieldViolation> = Vec::new();

    let method = desired.install_method.unwrap_or_else(|| {
        tracing::debug!(
            os_family = %facts.os_family,
            method = %profile.default_install_method,
            "install_method unset, using OS default"
        );
        profile.default_install_method
    });

    if method == InstallMethod::Repo && profile.package_manager.is_none() {
        violations.push(FieldViolation::new(
            "install_method",
            Some(method.as_str()),
            format!("no supported package manager on {}", facts.os_family),
        ));
    }

    let manage_repo = match (desired.manage_repo, method) {
        (Some(true), InstallMethod::Repo) => {
            if profile.repository.is_none() {
                violations.push(FieldViolation::new(
                    "manage_repo",
                    Some("true"),
                    format!("no managed package repository on {}", facts.os_family),
                ));
            }
            true
        }
        (Some(true), other) => {
            tracing::warn!(method = %other, "manage_repo ignored: install_method is not repo");
            false
        }
        (Some(false), _) => false,
        (None, m) => m == InstallMethod::Repo && profile.repository.is_some(),
    };

    if method.downloads_archive()
        && let Some(version) = &desired.version
        && semver::Version::parse(version).is_err()
    {
        violations.push(FieldViolation::new(
            "version",
            Some(version),
            "must be a semantic version such as 1.12.0",
        ));
    }

    for (field, value) in [
        ("bin_dir", &desired.bin_dir),
        ("config_dir", &desired.config_dir),
        ("download_dir", &desired.download_dir),
    ] {
        if let Some(path) = value
            && !path.starts_with('/')
        {
            violations.push(FieldViolation::new(field, Some(path), "must be an absolute path"));
        }
    }

    for (field, value) in [("user", &desired.user), ("group", &desired.group)] {
        if let Some(name) = value
            && !ACCOUNT_NAME_RE.is_match(name)
        {
            violations.push(FieldViolation::new(
                field,
                Some(name),
                "must be a valid account name",
            ));
        }
    }

    if let Some(mode) = &desired.config_mode
        && !OCTAL_MODE_RE.is_match(mode)
    {
        violations.push(FieldViolation::new(
            "config_mode",
            Some(mode),
            "must be an octal file mode such as 0750",
        ));
    }

    if desired.num_procs == Some(0) {
        violations.push(FieldViolation::new("num_procs", Some("0"), "must be at least 1"));
    }

    if let Some(options) = &desired.service_options
        && options.contains(['\n', '\r'])
    {
        violations.push(FieldViolation::new(
            "service_options",
            None,
            "must not contain line breaks",
        ));
    }

    if desired
        .extra_config
        .as_ref()
        .is_some_and(|extra| extra.contains_key(MLOCK_KEY))
    {
        violations.push(FieldViolation::new(
            "extra_config",
            Some(MLOCK_KEY),
            "set disable_mlock directly; it also decides the capability grant",
        ));
    }

    if !violations.is_empty() {
        return Err(ValidationError {
            os_family: facts.os_family,
            violations,
        });
    }

    Ok(ValidatedState {
        desired,
        facts,
        profile,
        method,
        manage_repo,
    })
}

// ── Unit tests ───────────────────────────────────────────────────────────────
