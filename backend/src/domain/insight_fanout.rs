//! Bounded concurrent insight generation for newly created clients.
//!
//! Every request settles independently; a failure or timeout is logged and
//! counted but never cancels the remaining requests or fails the run.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use futures_util::stream;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::domain::{InsightDocument, InsightStatus, SyntheticClientRecord};
use crate::domain::ports::{InsightRequest, InsightService, InsightServiceError};

/// Hard ceiling for concurrent insight requests.
pub const MAX_FANOUT_CONCURRENCY: usize = 50;

/// Fan-out limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanoutConfig {
    /// Concurrent request limit, clamped to `1..=MAX_FANOUT_CONCURRENCY`.
    pub max_concurrency: usize,
    /// Budget for a single request.
    pub call_timeout: Duration,
}

impl Default for FanoutConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 25,
            call_timeout: Duration::from_secs(10),
        }
    }
}

impl FanoutConfig {
    /// Effective width for a batch of `items` requests.
    pub fn width_for(&self, items: usize) -> usize {
        self.max_concurrency
            .clamp(1, MAX_FANOUT_CONCURRENCY)
            .min(items)
            .max(1)
    }
}

/// Aggregate outcome of one fan-out.
///
/// Only documents reported as succeeded count; pending documents are stored
/// but not yet an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FanoutTally {
    pub attempted: u32,
    pub succeeded: u32,
}

impl FanoutTally {
    /// Tally a batch of settled documents.
    pub fn of(documents: &[InsightDocument]) -> Self {
        let succeeded = documents
            .iter()
            .filter(|document| document.status == InsightStatus::Succeeded)
            .count();
        Self {
            attempted: u32::try_from(documents.len()).unwrap_or(u32::MAX),
            succeeded: u32::try_from(succeeded).unwrap_or(u32::MAX),
        }
    }

    /// Requests that failed, timed out or are still pending.
    pub fn failed(&self) -> u32 {
        self.attempted.saturating_sub(self.succeeded)
    }
}

/// Settled documents of one fan-out, one per client.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FanoutOutcome {
    pub documents: Vec<InsightDocument>,
    pub tally: FanoutTally,
}

/// Enrichment fan-out controller.
pub struct InsightFanout<S: ?Sized> {
    service: Arc<S>,
    config: FanoutConfig,
}

impl<S: ?Sized> Clone for InsightFanout<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            config: self.config,
        }
    }
}

impl<S> InsightFanout<S>
where
    S: InsightService + ?Sized,
{
    /// Create a controller over the insight service.
    pub fn new(service: Arc<S>, config: FanoutConfig) -> Self {
        Self { service, config }
    }

    /// Request one insight per client and wait for all of them to settle.
    ///
    /// A failed or timed-out request yields a `Failed` document for its
    /// client so the outcome always covers the whole batch.
    pub async fn enrich(&self, clients: &[SyntheticClientRecord]) -> FanoutOutcome {
        let width = self.config.width_for(clients.len());
        let call_timeout = self.config.call_timeout;
        let requests: Vec<InsightRequest> = clients.iter().map(InsightRequest::from).collect();

        let documents: Vec<InsightDocument> = stream::iter(requests)
            .map(|request| {
                let service = Arc::clone(&self.service);
                async move {
                    let result = timeout(call_timeout, service.generate_insight(&request))
                        .await
                        .unwrap_or_else(|_| {
                            Err(InsightServiceError::timeout(format!(
                                "no response within {}ms",
                                call_timeout.as_millis()
                            )))
                        });
                    match result {
                        Ok(document) => InsightDocument {
                            client_id: request.client_id,
                            ..document
                        },
                        Err(error) => {
                            warn!(
                                client_id = %request.client_id,
                                %error,
                                "insight generation failed"
                            );
                            InsightDocument {
                                client_id: request.client_id,
                                status: InsightStatus::Failed,
                                content: None,
                            }
                        }
                    }
                }
            })
            .buffer_unordered(width)
            .collect()
            .await;

        let tally = FanoutTally::of(&documents);
        info!(
            attempted = tally.attempted,
            succeeded = tally.succeeded,
            width,
            "insight fan-out settled"
        );
        FanoutOutcome { documents, tally }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{FixtureInsightService, MockInsightService};
    use crate::domain::TenantId;
    use chrono::Utc;
    use demo_catalog::{PersonalityType, ScoreVector};
    use rstest::rstest;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    fn clients(count: usize) -> Vec<SyntheticClientRecord> {
        let tenant = TenantId::random();
        (0..count)
            .map(|index| SyntheticClientRecord {
                id: Uuid::new_v4(),
                tenant_id: tenant,
                display_name: format!("Client {index}"),
                unique_identity: format!("client-{index}@client.demo.invalid"),
                organization: None,
                personality_type: PersonalityType::I,
                score_vector: ScoreVector::new(20, 45, 20, 15),
                created_at: Utc::now(),
            })
            .collect()
    }

    #[rstest]
    #[case(25, 25, 25)]
    #[case(25, 3, 3)]
    #[case(0, 10, 1)]
    #[case(500, 100, 50)]
    #[case(25, 0, 1)]
    fn width_is_bounded(#[case] configured: usize, #[case] items: usize, #[case] expected: usize) {
        let config = FanoutConfig {
            max_concurrency: configured,
            ..FanoutConfig::default()
        };
        assert_eq!(config.width_for(items), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn all_successes_are_counted() {
        let fanout = InsightFanout::new(Arc::new(FixtureInsightService), FanoutConfig::default());

        let outcome = fanout.enrich(&clients(25)).await;

        assert_eq!(outcome.tally, FanoutTally { attempted: 25, succeeded: 25 });
        assert_eq!(outcome.documents.len(), 25);
    }

    #[rstest]
    #[tokio::test]
    async fn failures_do_not_cancel_other_requests() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let mut service = MockInsightService::new();
        service.expect_generate_insight().returning(move |request| {
            let call = seen.fetch_add(1, Ordering::SeqCst);
            if call % 3 == 0 {
                Err(InsightServiceError::transport("connection reset"))
            } else {
                Ok(InsightDocument {
                    client_id: request.client_id,
                    status: InsightStatus::Succeeded,
                    content: None,
                })
            }
        });
        let fanout = InsightFanout::new(Arc::new(service), FanoutConfig::default());

        let outcome = fanout.enrich(&clients(9)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 9);
        assert_eq!(outcome.tally.attempted, 9);
        assert_eq!(outcome.tally.failed(), 3);
        let failed = outcome
            .documents
            .iter()
            .filter(|document| document.status == InsightStatus::Failed)
            .count();
        assert_eq!(failed, 3);
    }

    #[rstest]
    #[tokio::test]
    async fn empty_batch_reports_zero() {
        let fanout = InsightFanout::new(Arc::new(FixtureInsightService), FanoutConfig::default());
        assert_eq!(fanout.enrich(&[]).await, FanoutOutcome::default());
    }

    #[rstest]
    #[tokio::test]
    async fn pending_documents_are_kept_but_not_counted() {
        let mut service = MockInsightService::new();
        service.expect_generate_insight().returning(|request| {
            Ok(InsightDocument {
                client_id: request.client_id,
                status: InsightStatus::Pending,
                content: None,
            })
        });
        let fanout = InsightFanout::new(Arc::new(service), FanoutConfig::default());
        let batch = clients(4);

        let outcome = fanout.enrich(&batch).await;

        assert_eq!(outcome.tally, FanoutTally { attempted: 4, succeeded: 0 });
        let ids: std::collections::HashSet<_> =
            outcome.documents.iter().map(|document| document.client_id).collect();
        assert!(batch.iter().all(|client| ids.contains(&client.id)));
    }

    #[rstest]
    #[tokio::test]
    async fn enrichment_can_run_behind_a_boxed_send_future() {
        let fanout: InsightFanout<dyn InsightService> =
            InsightFanout::new(Arc::new(FixtureInsightService), FanoutConfig::default());
        let batch = clients(2);

        let future: futures_util::future::BoxFuture<'_, FanoutOutcome> =
            Box::pin(fanout.enrich(&batch));

        assert_eq!(future.await.tally.attempted, 2);
    }
}
