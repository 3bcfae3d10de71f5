//! Command implementations

pub mod facts;
pub mod render;
pub mod resolve;
pub mod version;

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use vaultplan_common::{NodeFacts, OsFamily, ServiceProvider};

use crate::app::AppContext;
use crate::application::services::resolve_node::{self, FactOverrides};
use crate::domain::Catalog;
use crate::infra::desired_state::StateFile;
use crate::infra::facts::AnyFacts;

/// Where the desired state and node facts come from.
#[derive(Args, Debug, Default)]
pub struct InputArgs {
    /// Desired-state document (YAML, or JSON with a .json extension) [env: VAULTPLAN_STATE]
    #[arg(long, value_name = "PATH")]
    pub state: Option<PathBuf>,

    /// Facts document; skips host detection [env: VAULTPLAN_FACTS]
    #[arg(long, value_name = "PATH")]
    pub facts: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: OverrideArgs,
}

/// Per-fact corrections applied after detection.
#[derive(Args, Debug, Default)]
pub struct OverrideArgs {
    /// Override the OS family
    #[arg(long, value_enum)]
    pub os_family: Option<OsFamily>,

    /// Override the OS major release
    #[arg(long, value_name = "MAJOR")]
    pub os_release: Option<u32>,

    /// Override the processor count
    #[arg(long, value_name = "N")]
    pub processors: Option<u32>,

    /// Override the CPU architecture (e.g. x86_64, aarch64)
    #[arg(long)]
    pub architecture: Option<String>,

    /// Override the detected service mechanism
    #[arg(long, value_enum)]
    pub service_provider: Option<ServiceProvider>,
}

impl From<&OverrideArgs> for FactOverrides {
    fn from(args: &OverrideArgs) -> Self {
        Self {
            os_family: args.os_family,
            os_release_major: args.os_release,
            architecture: args.architecture.clone(),
            processor_count: args.processors,
            service_provider: args.service_provider,
        }
    }
}

impl InputArgs {
    fn sources(&self, app: &AppContext) -> (StateFile, AnyFacts) {
        let settings = app
            .settings
            .clone()
            .overlay(self.state.clone(), self.facts.clone());
        (StateFile::new(settings.state), AnyFacts::from_path(settings.facts))
    }

    /// Load the desired state and facts, then resolve the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if an input cannot be read or resolution fails.
    pub fn resolve(&self, app: &AppContext) -> Result<Catalog> {
        let (state, facts) = self.sources(app);
        resolve_node::resolve_node(&state, &facts, &FactOverrides::from(&self.overrides))
    }

    /// Gather facts only.
    ///
    /// # Errors
    ///
    /// Returns an error if the facts cannot be read.
    pub fn facts(&self, app: &AppContext) -> Result<NodeFacts> {
        let (_, facts) = self.sources(app);
        resolve_node::gather_facts(&facts, &FactOverrides::from(&self.overrides))
    }
}
