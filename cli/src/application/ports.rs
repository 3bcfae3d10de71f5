//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and the shared types crate —
//! never from `crate::infra`, `crate::commands`, or `crate::output`.

use anyhow::Result;
use vaultplan_common::{DesiredState, NodeFacts};

// ── Input Ports ───────────────────────────────────────────────────────────────

/// Supplies the caller's desired state for one node.
pub trait DesiredStateSource {
    /// Load and parse the desired state.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or parsed.
    fn load(&self) -> Result<DesiredState>;

    /// Human-readable origin, used in error context.
    fn describe(&self) -> String;
}

/// Supplies environment facts about the target node.
pub trait FactSource {
    /// Gather the node facts.
    ///
    /// # Errors
    ///
    /// Returns an error if the facts cannot be detected or parsed.
    fn facts(&self) -> Result<NodeFacts>;
}
