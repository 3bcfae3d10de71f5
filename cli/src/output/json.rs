//! JSON output helpers.
//!
//! Provides the error-object formatter used by all `--json` code paths when
//! a command fails, and the machine-readable renderer.

use anyhow::{Context, Result};
use serde::Serialize;
use vaultplan_common::NodeFacts;

use crate::domain::{Catalog, PlanError};
use crate::output::Artifact;

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails (should not happen in
/// practice; `serde_json` only fails on non-finite floats and maps with
/// non-string keys, neither of which appear here).
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Error code for the JSON error object.
///
/// Domain failures carry their own code; everything else is an I/O or
/// parse failure around the domain.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    err.downcast_ref::<PlanError>().map_or("io", PlanError::code)
}

/// Pretty-print any serializable value.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("JSON serialization failed")
}

/// Machine-readable renderer for `--json`.
pub struct JsonRenderer;

impl JsonRenderer {
    /// Print the full catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_catalog(&self, catalog: &Catalog) -> Result<()> {
        println!("{}", to_pretty(catalog)?);
        Ok(())
    }

    /// Print the facts object.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_facts(&self, facts: &NodeFacts) -> Result<()> {
        println!("{}", to_pretty(facts)?);
        Ok(())
    }

    /// Print the artifact with its metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_artifact(&self, artifact: &Artifact<'_>) -> Result<()> {
        println!("{}", to_pretty(artifact)?);
        Ok(())
    }

    /// Print `{"version": ...}`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_version(&self, version: &str) -> Result<()> {
        println!("{}", to_pretty(&serde_json::json!({ "version": version }))?);
        Ok(())
    }
}
