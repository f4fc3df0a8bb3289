//! Archetype catalog and synthetic identity primitives for tenant demo data.
//!
//! This crate holds the pure parts of demo provisioning: the versioned
//! archetype catalog, the identity generator that keeps synthetic contact
//! addresses unique across tenants, and the response synthesizer that
//! produces cosmetic assessment answers. It has no knowledge of storage or
//! transport so the backend can depend on it without cycles.
//!
//! # Example
//!
//! ```
//! use demo_catalog::{ArchetypeCatalog, IdentityKind, synthetic_identity};
//! use uuid::Uuid;
//!
//! let catalog = ArchetypeCatalog::bundled().expect("bundled catalog is valid");
//! let tenant = Uuid::nil();
//! let first = catalog.clients().first().expect("catalog has clients");
//!
//! let identity = synthetic_identity(first.base_identity(), tenant, IdentityKind::Client, 0);
//! assert!(identity.ends_with(".demo.invalid"));
//! assert_eq!(catalog.clients().len(), 25);
//! ```

mod archetype;
mod catalog;
mod error;
mod identity;
mod responses;

pub use archetype::{ArchetypeTemplate, PersonalityType, SCORE_TOTAL, ScoreVector};
pub use catalog::{ArchetypeCatalog, SUPPORTED_CATALOG_VERSION};
pub use error::CatalogError;
pub use identity::{IdentityKind, LOCAL_PART_MAX, synthetic_identity};
pub use responses::{
    DOMINANT_DENOMINATOR, DOMINANT_NUMERATOR, QUESTION_COUNT, QuestionResponse, ResponseSet,
    ResponseSynthesizer,
};
