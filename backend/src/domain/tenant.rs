//! Tenant identity.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned by [`TenantId::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TenantIdValidationError {
    /// The identifier was empty.
    #[error("tenant id must not be empty")]
    EmptyId,
    /// The identifier was not a UUID.
    #[error("tenant id must be a valid UUID")]
    InvalidId,
}

/// Opaque, stable identifier of the account that owns provisioned data.
///
/// # Examples
/// ```
/// use demo_provisioner::domain::TenantId;
///
/// let tenant = TenantId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
/// assert_eq!(tenant.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
/// assert!(TenantId::new(" 3fa85f64-5717-4562-b3fc-2c963f66afa6").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantId(Uuid);

impl TenantId {
    /// Validate and construct a tenant id from its textual form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, TenantIdValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(TenantIdValidationError::EmptyId);
        }
        if raw.trim() != raw {
            return Err(TenantIdValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| TenantIdValidationError::InvalidId)
    }

    /// Wrap an already-parsed UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a random tenant id.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<TenantId> for String {
    fn from(value: TenantId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for TenantId {
    type Error = TenantIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
