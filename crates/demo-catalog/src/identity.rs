//! Deterministic synthetic identities that never collide across tenants.
//!
//! An identity has the shape `{local}-{index}@{kind}.t{tenant}.demo.invalid`.
//! The tenant's UUID appears in full, so identities for different tenants
//! live under different domains. The positional index keeps identities
//! unique within a tenant even when two templates share a base identity,
//! and the reserved `.invalid` top-level domain keeps them apart from every
//! real address.

use std::fmt;

use uuid::Uuid;

/// Maximum length of the sanitized local part before the index suffix.
pub const LOCAL_PART_MAX: usize = 48;

const FALLBACK_LOCAL_PART: &str = "demo";
const IDENTITY_DOMAIN_SUFFIX: &str = "demo.invalid";

/// Which synthetic population an identity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityKind {
    /// A demo client.
    Client,
    /// A demo staff member.
    Staff,
}

impl IdentityKind {
    /// Subdomain label for this kind.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Staff => "staff",
        }
    }
}

impl fmt::Display for IdentityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Derives the unique identity for the catalog entry at `index`.
///
/// The result is a pure function of its inputs, so re-provisioning a tenant
/// proposes exactly the same identities.
///
/// # Examples
///
/// ```
/// use demo_catalog::{IdentityKind, synthetic_identity};
/// use uuid::Uuid;
///
/// let tenant = Uuid::parse_str("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("uuid");
/// let identity = synthetic_identity("Avery.Stone@example.com", tenant, IdentityKind::Client, 3);
/// assert_eq!(
///     identity,
///     "avery.stone-3@client.t3fa85f6457174562b3fc2c963f66afa6.demo.invalid"
/// );
/// ```
#[must_use]
pub fn synthetic_identity(
    base_identity: &str,
    tenant: Uuid,
    kind: IdentityKind,
    index: usize,
) -> String {
    let local = sanitize_local_part(base_identity);
    format!(
        "{local}-{index}@{kind}.t{tenant}.{IDENTITY_DOMAIN_SUFFIX}",
        kind = kind.label(),
        tenant = tenant.simple(),
    )
}

fn sanitize_local_part(base_identity: &str) -> String {
    let raw_local = base_identity
        .split_once('@')
        .map_or(base_identity, |(local, _)| local);
    let cleaned: String = raw_local
        .chars()
        .map(|ch| ch.to_ascii_lowercase())
        .filter(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '.' | '_'))
        .take(LOCAL_PART_MAX)
        .collect();
    let trimmed = cleaned.trim_matches('.');
    if trimmed.is_empty() {
        FALLBACK_LOCAL_PART.to_owned()
    } else {
        trimmed.to_owned()
    }
}
