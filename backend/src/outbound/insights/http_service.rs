//! Reqwest-backed insight service adapter.
//!
//! Transport details only: JSON request encoding, a client-level timeout,
//! status mapping and response decoding. Retry policy belongs to the caller.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use crate::domain::ports::{InsightRequest, InsightService, InsightServiceError};
use crate::domain::{InsightDocument, InsightStatus};

const USER_AGENT: &str = concat!("demo-provisioner/", env!("CARGO_PKG_VERSION"));
const PREVIEW_CHAR_LIMIT: usize = 160;

/// Insight service reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpInsightService {
    client: Client,
    endpoint: Url,
}

impl HttpInsightService {
    /// Adapter posting to `endpoint`, giving up on any call after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns the reqwest error when the client cannot be built.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, endpoint })
    }

    /// Configured endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// Body returned by the insight service.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InsightResponseDto {
    #[serde(default)]
    status: Option<InsightStatus>,
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl InsightService for HttpInsightService {
    async fn generate_insight(
        &self,
        request: &InsightRequest,
    ) -> Result<InsightDocument, InsightServiceError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        decode_document(request, status, body.as_ref())
    }
}

fn decode_document(
    request: &InsightRequest,
    status: StatusCode,
    body: &[u8],
) -> Result<InsightDocument, InsightServiceError> {
    let dto: InsightResponseDto = serde_json::from_slice(body).map_err(|error| {
        InsightServiceError::decode(format!("invalid insight payload: {error}"))
    })?;
    let document_status = match (dto.status, dto.content.as_deref()) {
        (Some(InsightStatus::Failed), _) => {
            return Err(InsightServiceError::rejected(
                status.as_u16(),
                "service reported a failed insight",
            ));
        }
        (Some(explicit), _) => explicit,
        (None, Some(_)) => InsightStatus::Succeeded,
        (None, None) => InsightStatus::Pending,
    };
    Ok(InsightDocument {
        client_id: request.client_id,
        status: document_status,
        content: dto.content,
    })
}

fn map_transport_error(error: reqwest::Error) -> InsightServiceError {
    if error.is_timeout() {
        InsightServiceError::timeout(error.to_string())
    } else {
        InsightServiceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> InsightServiceError {
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            InsightServiceError::timeout(format!("status {}", status.as_u16()))
        }
        _ => InsightServiceError::rejected(status.as_u16(), body_preview(body)),
    }
}

fn body_preview(body: &[u8]) -> String {
    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        let preview: String = compact.chars().take(PREVIEW_CHAR_LIMIT).collect();
        format!("{preview}...")
    } else if compact.is_empty() {
        "empty body".to_owned()
    } else {
        compact
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use demo_catalog::{PersonalityType, ScoreVector};
    use rstest::{fixture, rstest};
    use uuid::Uuid;

    #[fixture]
    fn request() -> InsightRequest {
        InsightRequest {
            client_id: Uuid::new_v4(),
            display_name: "Marcus Bell".to_owned(),
            personality_type: PersonalityType::I,
            score_vector: ScoreVector::new(20, 45, 20, 15),
        }
    }

    #[rstest]
    fn request_serialises_with_camel_case_fields(request: InsightRequest) {
        let value = serde_json::to_value(&request).expect("serialise");

        assert_eq!(value["displayName"], "Marcus Bell");
        assert_eq!(value["personalityType"], "I");
        assert_eq!(value["scoreVector"]["I"], 45);
        assert!(value.get("clientId").is_some());
    }

    #[rstest]
    fn content_without_status_is_a_success(request: InsightRequest) {
        let document = decode_document(
            &request,
            StatusCode::OK,
            br#"{"content":"Energetic and persuasive."}"#,
        )
        .expect("decodes");

        assert_eq!(document.client_id, request.client_id);
        assert_eq!(document.status, InsightStatus::Succeeded);
    }

    #[rstest]
    fn accepted_without_content_is_pending(request: InsightRequest) {
        let document =
            decode_document(&request, StatusCode::ACCEPTED, b"{}").expect("decodes");

        assert_eq!(document.status, InsightStatus::Pending);
    }

    #[rstest]
    fn reported_failure_is_rejected(request: InsightRequest) {
        let err = decode_document(&request, StatusCode::OK, br#"{"status":"failed"}"#)
            .expect_err("failed insight");

        assert!(matches!(err, InsightServiceError::Rejected { status: 200, .. }));
    }

    #[rstest]
    fn malformed_body_is_decode_error(request: InsightRequest) {
        let err = decode_document(&request, StatusCode::OK, b"<html>").expect_err("not json");

        assert!(matches!(err, InsightServiceError::Decode { .. }));
    }

    #[rstest]
    #[case(StatusCode::GATEWAY_TIMEOUT, true)]
    #[case(StatusCode::REQUEST_TIMEOUT, true)]
    #[case(StatusCode::SERVICE_UNAVAILABLE, false)]
    #[case(StatusCode::BAD_REQUEST, false)]
    fn statuses_map_to_timeout_or_rejection(#[case] status: StatusCode, #[case] timeout: bool) {
        let err = map_status_error(status, b"upstream busy");

        if timeout {
            assert!(matches!(err, InsightServiceError::Timeout { .. }));
        } else {
            assert_eq!(
                err,
                InsightServiceError::rejected(status.as_u16(), "upstream busy")
            );
        }
    }

    #[rstest]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(PREVIEW_CHAR_LIMIT + 40);

        let preview = body_preview(body.as_bytes());

        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), PREVIEW_CHAR_LIMIT + 3);
    }

    #[rstest]
    fn client_builds_with_timeout() {
        let endpoint = Url::parse("http://127.0.0.1:9/insights").expect("url");
        let service =
            HttpInsightService::new(endpoint.clone(), Duration::from_secs(1)).expect("client");

        assert_eq!(service.endpoint(), &endpoint);
    }
}
