//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::fmt;

use thiserror::Error;
use vaultplan_common::{InstallMethod, OsFamily};

// ── Validation errors ─────────────────────────────────────────────────────────

/// One rejected field of the desired state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub value: Option<String>,
    pub reason: String,
}

impl FieldViolation {
    pub(crate) fn new(field: &'static str, value: Option<&str>, reason: impl Into<String>) -> Self {
        Self {
            field,
            value: value.map(str::to_string),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{} = '{value}': {}", self.field, self.reason),
            None => write!(f, "{}: {}", self.field, self.reason),
        }
    }
}

/// Structurally invalid or contradictory desired state.
///
/// Carries every violation found, not just the first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid desired state on {os_family}:\n{}", render_violations(.violations))]
pub struct ValidationError {
    pub os_family: OsFamily,
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    /// Returns `true` if `field` is among the rejected fields.
    #[must_use]
    pub fn names_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

fn render_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("  - {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Resolution errors ─────────────────────────────────────────────────────────

/// A derivation that cannot produce a consistent fact.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("download_url is required when install_method is {method}")]
    MissingDownloadUrl { method: InstallMethod },

    #[error(
        "manage_storage_dir is set but storage has no 'file' or 'raft' backend with a 'path'"
    )]
    MissingStoragePath,

    #[error("No processor count available on {os_family}: set num_procs or supply the processor_count fact")]
    MissingProcessorCount { os_family: OsFamily },
}

// ── Umbrella ──────────────────────────────────────────────────────────────────

/// Any failure of a node resolution. Nothing is produced when this is returned.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// A composed artifact could not be rendered; indicates a validation gap.
    #[error("Internal invariant violated: {0}")]
    Invariant(String),
}

impl PlanError {
    /// Stable machine-readable code for JSON error output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Resolution(_) => "resolution",
            Self::Invariant(_) => "invariant",
        }
    }
}
