//! Insight service used when no enrichment endpoint is configured.

use async_trait::async_trait;

use crate::domain::InsightDocument;
use crate::domain::ports::{InsightRequest, InsightService, InsightServiceError};

/// Fails every call, so runs report zero generated insights.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredInsightService;

#[async_trait]
impl InsightService for UnconfiguredInsightService {
    async fn generate_insight(
        &self,
        _request: &InsightRequest,
    ) -> Result<InsightDocument, InsightServiceError> {
        Err(InsightServiceError::transport(
            "no enrichment endpoint configured",
        ))
    }
}
