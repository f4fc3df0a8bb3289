//! Records created and removed by demo provisioning.
//!
//! Every row written by the provisioner is tagged with [`DEMO_SOURCE`] so
//! cleanup can leave organically created clients and staff untouched.

use chrono::{DateTime, Utc};
use demo_catalog::{PersonalityType, ResponseSet, ScoreVector};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::TenantId;

/// Source tag stored on every provisioned row.
pub const DEMO_SOURCE: &str = "demo";

/// Synthetic client expanded from a client archetype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticClientRecord {
    pub id: Uuid,
    pub tenant_id: TenantId,
    pub display_name: String,
    /// Globally unique contact identity from the identity generator.
    pub unique_identity: String,
    pub organization: Option<String>,
    pub personality_type: PersonalityType,
    pub score_vector: ScoreVector,
    pub created_at: DateTime<Utc>,
}

/// Synthetic staff member expanded from a staff archetype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticStaffRecord {
    pub id: Uuid,
    pub tenant_id: TenantId,
    pub display_name: String,
    pub unique_identity: String,
    pub role: Option<String>,
    pub personality_type: PersonalityType,
    pub score_vector: ScoreVector,
    pub created_at: DateTime<Utc>,
}

/// Assessment derived from a client's archetype.
///
/// `score_vector` and `dominant_type` are copied from the archetype; the
/// response set is cosmetic and is never used to recompute them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentRecord {
    pub id: Uuid,
    pub client_id: Uuid,
    pub tenant_id: TenantId,
    pub response_set: ResponseSet,
    pub score_vector: ScoreVector,
    pub dominant_type: PersonalityType,
    pub created_at: DateTime<Utc>,
}

/// Lifecycle of an enrichment document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightStatus {
    Pending,
    Succeeded,
    Failed,
}

impl InsightStatus {
    /// Storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }

    /// Parse the storage representation.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(Self::Pending),
            "succeeded" => Some(Self::Succeeded),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Enrichment document produced by the external insight service.
///
/// Ownership is weak: the document refers back to its client but cleanup
/// does not need it gone before the client can be deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightDocument {
    pub client_id: Uuid,
    pub status: InsightStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Row counts of provisioned data currently owned by a tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoDataCounts {
    pub clients: u64,
    pub staff: u64,
    pub assessments: u64,
    pub insight_documents: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(InsightStatus::Pending)]
    #[case(InsightStatus::Succeeded)]
    #[case(InsightStatus::Failed)]
    fn insight_status_storage_round_trip(#[case] status: InsightStatus) {
        assert_eq!(InsightStatus::parse(status.as_str()), Some(status));
    }

    #[rstest]
    fn insight_document_omits_missing_content() {
        let document = InsightDocument {
            client_id: Uuid::nil(),
            status: InsightStatus::Failed,
            content: None,
        };
        let json = serde_json::to_value(&document).expect("serialise");
        assert_eq!(
            json,
            serde_json::json!({
                "clientId": "00000000-0000-0000-0000-000000000000",
                "status": "failed"
            })
        );
    }
}
