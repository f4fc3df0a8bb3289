//! Internal Diesel row structs.
//!
//! These stay inside the persistence layer; repositories convert to and
//! from domain records at the boundary.

use chrono::{DateTime, Utc};
use demo_catalog::ScoreVector;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    AssessmentRecord, DEMO_SOURCE, InsightDocument, SyntheticClientRecord, SyntheticStaffRecord,
    TenantId,
};

use super::schema::{assessments, demo_clients, demo_staff, insight_documents, provisioning_log};

/// Score columns shared by clients, staff and assessments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScoreColumns {
    pub d: i16,
    pub i: i16,
    pub s: i16,
    pub c: i16,
}

impl From<ScoreVector> for ScoreColumns {
    fn from(value: ScoreVector) -> Self {
        Self {
            d: i16::from(value.d),
            i: i16::from(value.i),
            s: i16::from(value.s),
            c: i16::from(value.c),
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = demo_clients)]
pub(crate) struct NewClientRow<'a> {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub source: &'a str,
    pub display_name: &'a str,
    pub unique_identity: &'a str,
    pub organization: Option<&'a str>,
    pub personality_type: &'a str,
    pub score_d: i16,
    pub score_i: i16,
    pub score_s: i16,
    pub score_c: i16,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a SyntheticClientRecord> for NewClientRow<'a> {
    fn from(record: &'a SyntheticClientRecord) -> Self {
        let scores = ScoreColumns::from(record.score_vector);
        Self {
            id: record.id,
            tenant_id: *record.tenant_id.as_uuid(),
            source: DEMO_SOURCE,
            display_name: &record.display_name,
            unique_identity: &record.unique_identity,
            organization: record.organization.as_deref(),
            personality_type: record.personality_type.as_str(),
            score_d: scores.d,
            score_i: scores.i,
            score_s: scores.s,
            score_c: scores.c,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = demo_staff)]
pub(crate) struct NewStaffRow<'a> {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub source: &'a str,
    pub display_name: &'a str,
    pub unique_identity: &'a str,
    pub role: Option<&'a str>,
    pub personality_type: &'a str,
    pub score_d: i16,
    pub score_i: i16,
    pub score_s: i16,
    pub score_c: i16,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a SyntheticStaffRecord> for NewStaffRow<'a> {
    fn from(record: &'a SyntheticStaffRecord) -> Self {
        let scores = ScoreColumns::from(record.score_vector);
        Self {
            id: record.id,
            tenant_id: *record.tenant_id.as_uuid(),
            source: DEMO_SOURCE,
            display_name: &record.display_name,
            unique_identity: &record.unique_identity,
            role: record.role.as_deref(),
            personality_type: record.personality_type.as_str(),
            score_d: scores.d,
            score_i: scores.i,
            score_s: scores.s,
            score_c: scores.c,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = assessments)]
pub(crate) struct NewAssessmentRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub client_id: Uuid,
    pub response_set: serde_json::Value,
    pub score_d: i16,
    pub score_i: i16,
    pub score_s: i16,
    pub score_c: i16,
    pub dominant_type: &'static str,
    pub created_at: DateTime<Utc>,
}

impl NewAssessmentRow {
    /// Build a row, serialising the cosmetic response set as JSON.
    pub(crate) fn try_from_record(record: &AssessmentRecord) -> Result<Self, serde_json::Error> {
        let scores = ScoreColumns::from(record.score_vector);
        Ok(Self {
            id: record.id,
            tenant_id: *record.tenant_id.as_uuid(),
            client_id: record.client_id,
            response_set: serde_json::to_value(&record.response_set)?,
            score_d: scores.d,
            score_i: scores.i,
            score_s: scores.s,
            score_c: scores.c,
            dominant_type: record.dominant_type.as_str(),
            created_at: record.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = insight_documents)]
pub(crate) struct NewInsightDocumentRow<'a> {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub client_id: Uuid,
    pub status: &'static str,
    pub content: Option<&'a str>,
}

impl<'a> NewInsightDocumentRow<'a> {
    pub(crate) fn new(tenant_id: &TenantId, document: &'a InsightDocument) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id: *tenant_id.as_uuid(),
            client_id: document.client_id,
            status: document.status.as_str(),
            content: document.content.as_deref(),
        }
    }
}

/// Row read back from the provisioning log.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = provisioning_log)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProvisioningLogRow {
    pub tenant_id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub outcome: String,
    pub clients_created: Option<i32>,
    pub staff_created: Option<i32>,
    pub assessments_created: Option<i32>,
    pub insights_generated: Option<i32>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = provisioning_log)]
pub(crate) struct NewProvisioningLogRow<'a> {
    pub tenant_id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub outcome: &'a str,
    pub clients_created: Option<i32>,
    pub staff_created: Option<i32>,
    pub assessments_created: Option<i32>,
    pub insights_generated: Option<i32>,
    pub error_message: Option<&'a str>,
}
