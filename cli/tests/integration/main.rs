//! Integration tests for vaultplan
//!
//! These tests spawn the actual binary and test end-to-end behavior.
//! They are slower and should be run separately from unit tests.

mod cli_tests;
mod render_command;
mod resolve_command;
