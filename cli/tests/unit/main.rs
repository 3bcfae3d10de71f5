//! Unit tests for vaultplan
//!
//! These tests drive the library API directly and run fast without external I/O.

mod architecture;
mod property_tests;
