//! Tool settings loaded from `VAULTPLAN_*` environment variables via `envy`.
//!
//!   - `VAULTPLAN_STATE`  path of the desired-state document
//!   - `VAULTPLAN_FACTS`  path of a facts document (skips host detection)
//!
//! Command-line flags take precedence over these values.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

const ENV_PREFIX: &str = "VAULTPLAN_";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Desired-state document.
    pub state: Option<PathBuf>,
    /// Facts document.
    pub facts: Option<PathBuf>,
}

impl Settings {
    /// Load settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a `VAULTPLAN_*` variable cannot be deserialized.
    pub fn from_env() -> Result<Self> {
        envy::prefixed(ENV_PREFIX)
            .from_env()
            .context("failed to load settings from VAULTPLAN_* env vars")
    }

    /// Load settings from explicit `(name, value)` pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if a `VAULTPLAN_*` variable cannot be deserialized.
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX)
            .from_iter(vars)
            .context("failed to load settings from VAULTPLAN_* env vars")
    }

    /// Let explicit flag values win over the environment.
    #[must_use]
    pub fn overlay(self, state: Option<PathBuf>, facts: Option<PathBuf>) -> Self {
        Self {
            state: state.or(self.state),
            facts: facts.or(self.facts),
        }
    }
}
