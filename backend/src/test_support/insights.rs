//! Insight service double with scripted failures and latency.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::ports::{InsightRequest, InsightService, InsightServiceError};
use crate::domain::{InsightDocument, InsightStatus};

/// Insight service that fails the first `failures` calls.
#[derive(Debug, Default, Clone)]
pub struct ScriptedInsightService {
    failures_left: Arc<AtomicUsize>,
    calls: Arc<AtomicUsize>,
    delay: Option<Duration>,
}

impl ScriptedInsightService {
    /// Service that succeeds on every call.
    pub fn succeeding() -> Self {
        Self::default()
    }

    /// Service that rejects the first `failures` calls.
    pub fn failing_first(failures: usize) -> Self {
        Self {
            failures_left: Arc::new(AtomicUsize::new(failures)),
            ..Self::default()
        }
    }

    /// Delay every response by `delay`.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InsightService for ScriptedInsightService {
    async fn generate_insight(
        &self,
        request: &InsightRequest,
    ) -> Result<InsightDocument, InsightServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let should_fail = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| {
                left.checked_sub(1)
            })
            .is_ok();
        if should_fail {
            return Err(InsightServiceError::rejected(
                503_u16,
                "scripted insight failure",
            ));
        }
        Ok(InsightDocument {
            client_id: request.client_id,
            status: InsightStatus::Succeeded,
            content: Some(format!("Insight for {}", request.display_name)),
        })
    }
}
