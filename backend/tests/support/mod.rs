//! Shared helper utilities for backend integration tests.
//!
//! Integration tests compile as separate crates, so each suite pulls this
//! module in with `mod support;` and uses only what it needs.

pub mod cluster_skip;
pub mod embedded_postgres;

pub use cluster_skip::handle_cluster_setup_failure;
pub use embedded_postgres::{provision_template_database, shared_cluster};
