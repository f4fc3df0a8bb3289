//! Versioned archetype catalog parsing and validation.
//!
//! The catalog is pure data: one list of client archetypes and one list of
//! staff archetypes. Loading validates every entry up front so provisioning
//! never discovers a malformed template halfway through a run.

use serde::Deserialize;

use crate::archetype::{ArchetypeTemplate, SCORE_TOTAL};
use crate::error::CatalogError;

/// Catalog schema version understood by this crate.
pub const SUPPORTED_CATALOG_VERSION: u32 = 1;

const BUNDLED_CATALOG: &str = include_str!("../data/archetypes.json");

/// Client and staff archetype templates used to compose a demo dataset.
///
/// # Example
///
/// ```
/// use demo_catalog::ArchetypeCatalog;
///
/// let json = r#"{
///     "version": 1,
///     "clients": [{
///         "displayName": "Avery Stone",
///         "baseIdentity": "avery.stone@example.com",
///         "organization": "Northwind",
///         "personalityType": "D",
///         "scoreVector": {"D": 52, "I": 18, "S": 12, "C": 18}
///     }],
///     "staff": [{
///         "displayName": "Jordan Vale",
///         "baseIdentity": "jordan.vale@example.com",
///         "role": "Account Manager",
///         "personalityType": "I",
///         "scoreVector": {"D": 20, "I": 48, "S": 20, "C": 12}
///     }]
/// }"#;
///
/// let catalog = ArchetypeCatalog::from_json(json).expect("valid catalog");
/// assert_eq!(catalog.clients().len(), 1);
/// assert_eq!(catalog.staff().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchetypeCatalog {
    version: u32,
    clients: Vec<ArchetypeTemplate>,
    staff: Vec<ArchetypeTemplate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArchetypeCatalog {
    version: u32,
    clients: Vec<ArchetypeTemplate>,
    staff: Vec<ArchetypeTemplate>,
}

impl ArchetypeCatalog {
    /// Parses and validates a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the JSON is malformed, the version is
    /// unsupported, either list is empty, or any archetype is invalid.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: RawArchetypeCatalog =
            serde_json::from_str(json).map_err(|e| CatalogError::ParseError {
                message: e.to_string(),
            })?;
        Self::from_raw(raw)
    }

    /// Validates already-built template lists.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] under the same rules as [`Self::from_json`].
    pub fn new(
        clients: Vec<ArchetypeTemplate>,
        staff: Vec<ArchetypeTemplate>,
    ) -> Result<Self, CatalogError> {
        Self::from_raw(RawArchetypeCatalog {
            version: SUPPORTED_CATALOG_VERSION,
            clients,
            staff,
        })
    }

    /// Returns the catalog compiled into this crate: 25 clients and 25 staff.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] only if the bundled file was edited into an
    /// invalid state.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_CATALOG)
    }

    fn from_raw(raw: RawArchetypeCatalog) -> Result<Self, CatalogError> {
        if raw.version != SUPPORTED_CATALOG_VERSION {
            return Err(CatalogError::UnsupportedVersion {
                expected: SUPPORTED_CATALOG_VERSION,
                actual: raw.version,
            });
        }
        if raw.clients.is_empty() {
            return Err(CatalogError::EmptyClients);
        }
        if raw.staff.is_empty() {
            return Err(CatalogError::EmptyStaff);
        }

        validate_templates("clients", &raw.clients)?;
        validate_templates("staff", &raw.staff)?;

        Ok(Self {
            version: raw.version,
            clients: raw.clients,
            staff: raw.staff,
        })
    }

    /// Returns the catalog version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Client archetypes in catalog order.
    #[must_use]
    pub fn clients(&self) -> &[ArchetypeTemplate] {
        &self.clients
    }

    /// Staff archetypes in catalog order.
    #[must_use]
    pub fn staff(&self) -> &[ArchetypeTemplate] {
        &self.staff
    }
}

fn validate_templates(list: &'static str, templates: &[ArchetypeTemplate]) -> Result<(), CatalogError> {
    for (index, template) in templates.iter().enumerate() {
        if template.display_name().trim().is_empty() {
            return Err(CatalogError::BlankField {
                list,
                index,
                field: "displayName",
            });
        }
        if template.base_identity().trim().is_empty() {
            return Err(CatalogError::BlankField {
                list,
                index,
                field: "baseIdentity",
            });
        }

        let scores = template.score_vector();
        let total = scores.total();
        if total != SCORE_TOTAL {
            return Err(CatalogError::ScoreTotalMismatch {
                list,
                index,
                total,
                expected: SCORE_TOTAL,
            });
        }

        if !scores.is_dominant(template.personality_type()) {
            return Err(CatalogError::DominantTypeMismatch {
                list,
                index,
                declared: template.personality_type().as_char(),
                dominant: scores.dominant().as_char(),
            });
        }
    }
    Ok(())
}
