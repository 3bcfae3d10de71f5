//! Application service — resolve one node's desired state into a catalog.

use anyhow::{Context, Result};
use vaultplan_common::{NodeFacts, OsFamily, ServiceProvider};

use crate::application::ports::{DesiredStateSource, FactSource};
use crate::domain::{Catalog, resolve};

/// Caller-supplied corrections applied on top of gathered facts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactOverrides {
    pub os_family: Option<OsFamily>,
    pub os_release_major: Option<u32>,
    pub architecture: Option<String>,
    pub processor_count: Option<u32>,
    pub service_provider: Option<ServiceProvider>,
}

impl FactOverrides {
    /// Patch `facts` with every override that is set.
    #[must_use]
    pub fn apply(&self, mut facts: NodeFacts) -> NodeFacts {
        if let Some(family) = self.os_family {
            facts.os_family = family;
        }
        if let Some(major) = self.os_release_major {
            facts.os_release_major = Some(major);
        }
        if let Some(arch) = &self.architecture {
            facts.architecture.clone_from(arch);
        }
        if let Some(count) = self.processor_count {
            facts.processor_count = count;
        }
        if let Some(provider) = self.service_provider {
            facts.service_provider = Some(provider);
        }
        facts
    }
}

/// Gather facts and apply overrides.
///
/// # Errors
///
/// Returns an error if the fact source fails.
pub fn gather_facts(source: &impl FactSource, overrides: &FactOverrides) -> Result<NodeFacts> {
    let facts = overrides.apply(source.facts().context("cannot gather node facts")?);
    tracing::debug!(
        os_family = %facts.os_family,
        release = ?facts.os_release_major,
        arch = %facts.architecture,
        processors = facts.processor_count,
        "facts gathered"
    );
    Ok(facts)
}

/// Load the desired state, gather facts and resolve the node catalog.
///
/// Domain failures keep their [`crate::domain::PlanError`] type inside the
/// returned `anyhow::Error`, so callers can downcast for error codes.
///
/// # Errors
///
/// Returns an error if loading fails or the desired state is rejected.
pub fn resolve_node(
    state: &impl DesiredStateSource,
    facts: &impl FactSource,
    overrides: &FactOverrides,
) -> Result<Catalog> {
    let desired = state
        .load()
        .with_context(|| format!("cannot load desired state from {}", state.describe()))?;
    let facts = gather_facts(facts, overrides)?;
    Ok(resolve(desired, facts)?)
}
