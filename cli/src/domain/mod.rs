//! Domain layer — pure resolution logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.
//!
//! Stages run strictly forward: [`validate`] → [`resolve_installation`] →
//! {[`compose`], [`descriptor`]}. Each stage takes the previous stage's output
//! type, so they cannot be invoked out of order.

pub mod catalog;
pub mod document;
pub mod error;
pub mod install;
pub mod os_profile;
pub mod service;
pub mod validate;

pub use catalog::{Catalog, resolve};
pub use document::{ConfigDocument, compose};
pub use error::{FieldViolation, PlanError, ResolutionError, ValidationError};
pub use install::{CapabilityGrant, InstallationPlan, ManagementFlags, resolve_installation};
pub use os_profile::OsProfile;
pub use service::{ServiceDescriptor, descriptor};
pub use validate::{ValidatedState, validate};
