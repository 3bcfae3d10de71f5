//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: reading desired-state and
//! fact documents, probing the local host, and loading tool settings from
//! the environment.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod desired_state;
pub mod facts;
pub mod settings;
