//! Port abstraction for the external insight generation service.

use async_trait::async_trait;
use demo_catalog::{PersonalityType, ScoreVector};
use serde::Serialize;
use uuid::Uuid;

use super::define_port_error;
use crate::domain::{InsightDocument, InsightStatus, SyntheticClientRecord};

define_port_error! {
    /// Errors raised while requesting an insight for one client.
    pub enum InsightServiceError {
        /// The request never reached the service.
        Transport { message: String } => "insight transport failed: {message}",
        /// The service did not answer in time.
        Timeout { message: String } => "insight request timed out: {message}",
        /// The service answered with a non-success status.
        Rejected { status: u16, message: String } =>
            "insight service rejected request with status {status}: {message}",
        /// The response body could not be decoded.
        Decode { message: String } => "insight response decode failed: {message}",
    }
}

/// Payload sent to the insight service for one client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightRequest {
    pub client_id: Uuid,
    pub display_name: String,
    pub personality_type: PersonalityType,
    pub score_vector: ScoreVector,
}

impl From<&SyntheticClientRecord> for InsightRequest {
    fn from(record: &SyntheticClientRecord) -> Self {
        Self {
            client_id: record.id,
            display_name: record.display_name.clone(),
            personality_type: record.personality_type,
            score_vector: record.score_vector,
        }
    }
}

/// Port for generating a personality insight document.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InsightService: Send + Sync {
    /// Generate an insight document for the client. The caller stores it.
    async fn generate_insight(
        &self,
        request: &InsightRequest,
    ) -> Result<InsightDocument, InsightServiceError>;
}

/// Fixture service that succeeds immediately with canned content.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureInsightService;

#[async_trait]
impl InsightService for FixtureInsightService {
    async fn generate_insight(
        &self,
        request: &InsightRequest,
    ) -> Result<InsightDocument, InsightServiceError> {
        Ok(InsightDocument {
            client_id: request.client_id,
            status: InsightStatus::Succeeded,
            content: Some(format!(
                "{} leads with {}.",
                request.display_name,
                request.personality_type.as_str()
            )),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn request() -> InsightRequest {
        InsightRequest {
            client_id: Uuid::nil(),
            display_name: "Avery Stone".to_owned(),
            personality_type: PersonalityType::D,
            score_vector: ScoreVector::new(55, 20, 10, 15),
        }
    }

    #[rstest]
    fn request_serialises_in_camel_case() {
        let value = serde_json::to_value(request()).expect("serialise");
        assert_eq!(value["clientId"], json!(Uuid::nil()));
        assert_eq!(value["displayName"], json!("Avery Stone"));
        assert_eq!(value["scoreVector"]["D"], json!(55));
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_returns_succeeded_document() {
        let document = FixtureInsightService
            .generate_insight(&request())
            .await
            .expect("fixture succeeds");
        assert_eq!(document.status, InsightStatus::Succeeded);
        assert_eq!(document.client_id, Uuid::nil());
    }

    #[rstest]
    fn rejected_error_includes_status() {
        let err = InsightServiceError::rejected(502_u16, "bad gateway");
        assert_eq!(
            err.to_string(),
            "insight service rejected request with status 502: bad gateway"
        );
    }
}
