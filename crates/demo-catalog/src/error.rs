//! Error types for the demo-catalog crate.
//!
//! Catalog loading fails fast with one semantic variant per validation rule
//! so operators can fix a replacement catalog without reading source code.

use thiserror::Error;

/// Errors raised while parsing or validating an archetype catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The catalog JSON is malformed or missing required fields.
    #[error("invalid catalog JSON: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
    },

    /// The catalog version is not supported.
    #[error("unsupported catalog version: expected {expected}, found {actual}")]
    UnsupportedVersion {
        /// Version this crate understands.
        expected: u32,
        /// Version declared by the catalog.
        actual: u32,
    },

    /// The catalog declares no client archetypes.
    #[error("catalog contains no client archetypes")]
    EmptyClients,

    /// The catalog declares no staff archetypes.
    #[error("catalog contains no staff archetypes")]
    EmptyStaff,

    /// An archetype has a blank display name or base identity.
    #[error("{list} archetype at index {index} has a blank {field}")]
    BlankField {
        /// Which list the archetype belongs to (`clients` or `staff`).
        list: &'static str,
        /// Position of the archetype in its list.
        index: usize,
        /// Name of the blank field.
        field: &'static str,
    },

    /// An archetype's score vector does not sum to the fixed total.
    #[error("{list} archetype at index {index} scores sum to {total}, expected {expected}")]
    ScoreTotalMismatch {
        /// Which list the archetype belongs to (`clients` or `staff`).
        list: &'static str,
        /// Position of the archetype in its list.
        index: usize,
        /// Observed total.
        total: u32,
        /// Required total.
        expected: u32,
    },

    /// An archetype's label disagrees with its highest-scoring dimension.
    #[error("{list} archetype at index {index} is labelled {declared} but scores highest on {dominant}")]
    DominantTypeMismatch {
        /// Which list the archetype belongs to (`clients` or `staff`).
        list: &'static str,
        /// Position of the archetype in its list.
        index: usize,
        /// Declared personality type letter.
        declared: char,
        /// Highest-scoring dimension letter.
        dominant: char,
    },
}
