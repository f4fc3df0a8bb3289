//! Runtime wiring for demo provisioning.
//!
//! Shared by the HTTP server and the operator CLI so both build the service
//! from the same settings.

mod catalog_loader;
mod config;
mod wiring;

pub use catalog_loader::{CatalogLoadError, load_catalog};
pub use config::ProvisionerSettings;
pub use wiring::{WiringError, build_provisioning_service, insight_service_for};
