//! Demo provisioning orchestrator.
//!
//! Runs the cooldown claim, cascading cleanup, dataset composition, insight
//! fan-out and audit logging strictly in that order. Only the fan-out runs
//! work concurrently.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::TimeDelta;
use demo_catalog::{ArchetypeCatalog, ResponseSynthesizer};
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::cooldown::{CooldownDecision, CooldownGuard, DEFAULT_COOLDOWN_HOURS};
use crate::domain::demo_cleanup::{CleanupFailure, DemoCleanup};
use crate::domain::demo_composer::{CompositionFailure, DemoComposer};
use crate::domain::insight_fanout::{FanoutConfig, FanoutOutcome, InsightFanout};
use crate::domain::ports::{
    DemoDataRepository, DemoProvisioningCommand, InsightService, ProvisioningCounts,
    ProvisioningLogRepository, ProvisioningLogRepositoryError, ProvisioningSummary,
};
use crate::domain::provisioning_log::ProvisioningLogger;
use crate::domain::{Error, TenantId};

/// Fatal provisioning outcomes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProvisioningError {
    /// The tenant ran the provisioner inside the cooldown window.
    #[error("demo data was provisioned recently; retry in {retry_after_hours} hour(s)")]
    RateLimited { retry_after_hours: u32 },
    /// The provisioning log could not be read or claimed.
    #[error("cooldown guard unavailable: {0}")]
    GuardUnavailable(#[source] ProvisioningLogRepositoryError),
    /// A parent cleanup stage failed.
    #[error(transparent)]
    CleanupFailed(#[from] CleanupFailure),
    /// A composition stage failed after earlier stages committed.
    #[error(transparent)]
    CompositionFailed(#[from] CompositionFailure),
}

impl From<ProvisioningError> for Error {
    fn from(value: ProvisioningError) -> Self {
        match value {
            ProvisioningError::RateLimited { retry_after_hours } => Error::rate_limited(format!(
                "Demo data was provisioned recently. Try again in {retry_after_hours} hour(s)."
            ))
            .with_details(json!({ "retryAfterHours": retry_after_hours })),
            ProvisioningError::GuardUnavailable(ProvisioningLogRepositoryError::Connection {
                message,
            }) => Error::service_unavailable(format!("provisioning log unavailable: {message}")),
            ProvisioningError::GuardUnavailable(ProvisioningLogRepositoryError::Query {
                message,
            }) => Error::internal(format!("provisioning log error: {message}")),
            ProvisioningError::CleanupFailed(failure) => Error::provisioning_failed(format!(
                "Could not remove previous demo {}. No new demo data was created.",
                failure.stage
            ))
            .with_details(json!({
                "step": "cleanup",
                "stage": failure.stage.as_str(),
            })),
            ProvisioningError::CompositionFailed(failure) => Error::provisioning_failed(format!(
                "Could not create demo {}. Reset demo data again to clear partial records.",
                failure.stage
            ))
            .with_details(json!({
                "step": "composition",
                "stage": failure.stage.as_str(),
                "committed": failure.committed,
            })),
        }
    }
}

/// Port bundle required by the provisioning service.
pub struct DemoProvisioningPorts {
    /// Append-only provisioning log.
    pub provisioning_log: Arc<dyn ProvisioningLogRepository>,
    /// Tenant demo record store.
    pub demo_data: Arc<dyn DemoDataRepository>,
    /// External insight generator.
    pub insights: Arc<dyn InsightService>,
}

impl DemoProvisioningPorts {
    /// Build a port bundle.
    pub fn new(
        provisioning_log: Arc<dyn ProvisioningLogRepository>,
        demo_data: Arc<dyn DemoDataRepository>,
        insights: Arc<dyn InsightService>,
    ) -> Self {
        Self {
            provisioning_log,
            demo_data,
            insights,
        }
    }
}

/// Tunables for one service instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoProvisioningConfig {
    /// Minimum time between two runs for one tenant.
    pub cooldown: TimeDelta,
    /// Insight fan-out limits.
    pub fanout: FanoutConfig,
    /// Fixed response-synthesis seed; fresh entropy per run when unset.
    pub response_seed: Option<u64>,
}

impl Default for DemoProvisioningConfig {
    fn default() -> Self {
        Self {
            cooldown: TimeDelta::hours(i64::from(DEFAULT_COOLDOWN_HOURS)),
            fanout: FanoutConfig::default(),
            response_seed: None,
        }
    }
}

/// Demo provisioning service implementing the driving port.
#[derive(Clone)]
pub struct DemoProvisioningService {
    guard: CooldownGuard<dyn ProvisioningLogRepository>,
    cleanup: DemoCleanup<dyn DemoDataRepository>,
    composer: DemoComposer<dyn DemoDataRepository>,
    fanout: InsightFanout<dyn InsightService>,
    demo_data: Arc<dyn DemoDataRepository>,
    logger: ProvisioningLogger<dyn ProvisioningLogRepository>,
    catalog: Arc<ArchetypeCatalog>,
    response_seed: Option<u64>,
}

impl DemoProvisioningService {
    /// Wire the service from its ports.
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use demo_catalog::ArchetypeCatalog;
    /// # use demo_provisioner::domain::ports::{
    /// #     FixtureDemoDataRepository, FixtureInsightService, FixtureProvisioningLogRepository,
    /// # };
    /// # use demo_provisioner::domain::{
    /// #     DemoProvisioningConfig, DemoProvisioningPorts, DemoProvisioningService, TenantId,
    /// # };
    /// # use mockable::DefaultClock;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let service = DemoProvisioningService::new(
    ///     DemoProvisioningPorts::new(
    ///         Arc::new(FixtureProvisioningLogRepository::default()),
    ///         Arc::new(FixtureDemoDataRepository),
    ///         Arc::new(FixtureInsightService),
    ///     ),
    ///     Arc::new(ArchetypeCatalog::bundled()?),
    ///     Arc::new(DefaultClock),
    ///     DemoProvisioningConfig::default(),
    /// );
    /// let summary = service.provision_demo(&TenantId::random()).await?;
    /// assert_eq!(summary.clients_created, 25);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(
        ports: DemoProvisioningPorts,
        catalog: Arc<ArchetypeCatalog>,
        clock: Arc<dyn Clock>,
        config: DemoProvisioningConfig,
    ) -> Self {
        let DemoProvisioningPorts {
            provisioning_log,
            demo_data,
            insights,
        } = ports;
        Self {
            guard: CooldownGuard::new(
                Arc::clone(&provisioning_log),
                Arc::clone(&clock),
                config.cooldown,
            ),
            cleanup: DemoCleanup::new(Arc::clone(&demo_data)),
            composer: DemoComposer::new(Arc::clone(&demo_data), Arc::clone(&clock)),
            fanout: InsightFanout::new(insights, config.fanout),
            demo_data,
            logger: ProvisioningLogger::new(provisioning_log, clock),
            catalog,
            response_seed: config.response_seed,
        }
    }

    /// Read-only cooldown probe for status reporting.
    pub async fn cooldown_status(
        &self,
        tenant_id: &TenantId,
    ) -> Result<CooldownDecision, ProvisioningError> {
        self.guard
            .check(tenant_id)
            .await
            .map_err(ProvisioningError::GuardUnavailable)
    }

    /// Reset the tenant to a fresh demo dataset.
    pub async fn provision_demo(
        &self,
        tenant_id: &TenantId,
    ) -> Result<ProvisioningSummary, ProvisioningError> {
        let decision = self
            .guard
            .claim(tenant_id)
            .await
            .map_err(ProvisioningError::GuardUnavailable)?;
        if let CooldownDecision::RateLimited {
            retry_after_hours, ..
        } = decision
        {
            warn!(%tenant_id, retry_after_hours, "demo provisioning rate limited");
            return Err(ProvisioningError::RateLimited { retry_after_hours });
        }

        if let Err(failure) = self.cleanup.purge(tenant_id).await {
            self.logger
                .record_failure(tenant_id, &failure.to_string())
                .await;
            return Err(failure.into());
        }

        let mut synthesizer = self
            .response_seed
            .map_or_else(ResponseSynthesizer::from_entropy, ResponseSynthesizer::seeded);
        let dataset = self
            .composer
            .plan(tenant_id, &self.catalog, &mut synthesizer);
        let committed = match self.composer.compose(&dataset).await {
            Ok(committed) => committed,
            Err(failure) => {
                self.logger
                    .record_failure(tenant_id, &failure.to_string())
                    .await;
                return Err(failure.into());
            }
        };

        let enrichment = self.fanout.enrich(&dataset.clients).await;
        let insights = self.store_insights(tenant_id, &enrichment).await;

        let counts = ProvisioningCounts {
            clients: committed.clients,
            staff: committed.staff,
            assessments: committed.assessments,
            insights,
        };
        self.logger.record_success(tenant_id, counts).await;

        info!(
            %tenant_id,
            clients = counts.clients,
            staff = counts.staff,
            assessments = counts.assessments,
            insights = counts.insights,
            "demo provisioning completed"
        );
        Ok(ProvisioningSummary {
            clients_created: counts.clients,
            staff_created: counts.staff,
            assessments_created: counts.assessments,
            insights_generated: counts.insights,
        })
    }
}

impl DemoProvisioningService {
    /// Persist settled documents and return how many succeeded.
    ///
    /// Enrichment is never fatal: when the documents cannot be stored the
    /// run reports zero insights.
    async fn store_insights(&self, tenant_id: &TenantId, enrichment: &FanoutOutcome) -> u32 {
        if enrichment.documents.is_empty() {
            return 0;
        }
        match self
            .demo_data
            .insert_insight_documents(tenant_id, &enrichment.documents)
            .await
        {
            Ok(()) => enrichment.tally.succeeded,
            Err(error) => {
                warn!(%tenant_id, %error, "insight documents could not be stored");
                0
            }
        }
    }
}

#[async_trait]
impl DemoProvisioningCommand for DemoProvisioningService {
    async fn provision(&self, tenant_id: &TenantId) -> Result<ProvisioningSummary, Error> {
        self.provision_demo(tenant_id).await.map_err(Error::from)
    }
}

#[cfg(test)]
#[path = "demo_provisioning_tests.rs"]
mod tests;
