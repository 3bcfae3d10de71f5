//! Infrastructure implementation of the `DesiredStateSource` port.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use vaultplan_common::DesiredState;

use crate::application::ports::DesiredStateSource;

/// Desired state read from a YAML or JSON document on disk.
///
/// With no path every parameter is left unset, so resolution runs on pure
/// defaults.
pub struct StateFile {
    path: Option<PathBuf>,
}

impl StateFile {
    /// Source reading from `path`, or the all-defaults state when `None`.
    #[must_use]
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl DesiredStateSource for StateFile {
    fn load(&self) -> Result<DesiredState> {
        let Some(path) = &self.path else {
            tracing::debug!("no desired-state document, using defaults");
            return Ok(DesiredState::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        parse_document(path, &content).with_context(|| format!("cannot parse {}", path.display()))
    }

    fn describe(&self) -> String {
        self.path
            .as_ref()
            .map_or_else(|| "(defaults)".to_string(), |p| p.display().to_string())
    }
}

/// Parse a document as JSON when the file ends in `.json`, YAML otherwise.
///
/// YAML is a superset of JSON, but parsing `.json` files with `serde_json`
/// gives error positions that match the file the user wrote.
///
/// # Errors
///
/// Returns an error if the document does not deserialize into `T`.
pub fn parse_document<T: serde::de::DeserializeOwned>(path: &Path, content: &str) -> Result<T> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        Ok(serde_json::from_str(content)?)
    } else {
        Ok(serde_yaml::from_str(content)?)
    }
}
