//! Tenant demo-environment provisioner.
//!
//! Resets a tenant to a fresh synthetic dataset: cooldown check, cascading
//! cleanup of the previous demo records, composition from the archetype
//! catalog, insight fan-out and an audit log entry.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod provisioning;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
