//! Builds the provisioning service from settings and a database pool.

use std::sync::Arc;

use mockable::DefaultClock;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use crate::domain::ports::InsightService;
use crate::domain::{DemoProvisioningPorts, DemoProvisioningService};
use crate::outbound::insights::{HttpInsightService, UnconfiguredInsightService};
use crate::outbound::persistence::{
    DbPool, DieselDemoDataRepository, DieselProvisioningLogRepository,
};

use super::catalog_loader::{CatalogLoadError, load_catalog};
use super::config::ProvisionerSettings;

/// Errors raised while assembling the provisioning service.
#[derive(Debug, Error)]
pub enum WiringError {
    /// The archetype catalog could not be loaded.
    #[error(transparent)]
    Catalog(#[from] CatalogLoadError),
    /// The enrichment endpoint is not a valid URL.
    #[error("invalid enrichment endpoint '{value}': {source}")]
    EndpointUrl {
        /// Configured value.
        value: String,
        /// Parse failure.
        #[source]
        source: url::ParseError,
    },
    /// The HTTP client for the insight service could not be built.
    #[error("failed to build insight client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Insight adapter selected by `settings`.
///
/// Without an endpoint every call fails fast, so runs report zero insights.
pub fn insight_service_for(
    settings: &ProvisionerSettings,
) -> Result<Arc<dyn InsightService>, WiringError> {
    let Some(raw) = settings.enrichment_endpoint() else {
        warn!("no enrichment endpoint configured; demo runs will generate no insights");
        return Ok(Arc::new(UnconfiguredInsightService));
    };
    let endpoint = Url::parse(raw).map_err(|source| WiringError::EndpointUrl {
        value: raw.to_owned(),
        source,
    })?;
    let service = HttpInsightService::new(endpoint, settings.enrichment_timeout())
        .map_err(WiringError::HttpClient)?;
    info!(endpoint = %service.endpoint(), "insight service configured");
    Ok(Arc::new(service))
}

/// Wire the Diesel-backed provisioning service.
///
/// # Examples
///
/// ```rust,no_run
/// use demo_provisioner::outbound::persistence::{DbPool, PoolConfig};
/// use demo_provisioner::provisioning::{ProvisionerSettings, build_provisioning_service};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = DbPool::new(PoolConfig::new("postgres://localhost/demo")).await?;
/// let service = build_provisioning_service(&ProvisionerSettings::default(), pool)?;
/// # let _ = service;
/// # Ok(())
/// # }
/// ```
pub fn build_provisioning_service(
    settings: &ProvisionerSettings,
    pool: DbPool,
) -> Result<DemoProvisioningService, WiringError> {
    let catalog = load_catalog(settings.catalog_path.as_deref())?;
    let insights = insight_service_for(settings)?;
    let ports = DemoProvisioningPorts::new(
        Arc::new(DieselProvisioningLogRepository::new(pool.clone())),
        Arc::new(DieselDemoDataRepository::new(pool)),
        insights,
    );
    Ok(DemoProvisioningService::new(
        ports,
        Arc::new(catalog),
        Arc::new(DefaultClock),
        settings.service_config(),
    ))
}
