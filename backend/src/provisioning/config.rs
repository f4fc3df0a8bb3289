//! Provisioner configuration loaded via OrthoConfig.

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use chrono::TimeDelta;
use ortho_config::{OrthoConfig, OrthoResult};
use serde::Deserialize;

use crate::domain::{
    DEFAULT_COOLDOWN_HOURS, DemoProvisioningConfig, FanoutConfig, MAX_FANOUT_CONCURRENCY,
};

const DEFAULT_FANOUT_CONCURRENCY: usize = 25;
const DEFAULT_ENRICHMENT_TIMEOUT_SECS: u64 = 10;

/// Tunables for the provisioning service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DEMO_PROVISIONER")]
pub struct ProvisionerSettings {
    /// Hours a tenant must wait between runs.
    #[ortho_config(default = 24)]
    pub cooldown_hours: u32,
    /// Concurrent insight requests per run.
    #[ortho_config(default = 25)]
    pub fanout_concurrency: usize,
    /// Budget for one insight request, in seconds.
    #[ortho_config(default = 10)]
    pub enrichment_timeout_secs: u64,
    /// Insight service URL. Enrichment is skipped when unset.
    pub enrichment_endpoint: Option<String>,
    /// Replacement archetype catalog file.
    pub catalog_path: Option<PathBuf>,
}

impl Default for ProvisionerSettings {
    fn default() -> Self {
        Self {
            cooldown_hours: DEFAULT_COOLDOWN_HOURS,
            fanout_concurrency: DEFAULT_FANOUT_CONCURRENCY,
            enrichment_timeout_secs: DEFAULT_ENRICHMENT_TIMEOUT_SECS,
            enrichment_endpoint: None,
            catalog_path: None,
        }
    }
}

impl ProvisionerSettings {
    /// Load from environment variables and configuration files only.
    ///
    /// Binaries own their command line, so no arguments are parsed here.
    ///
    /// # Errors
    ///
    /// Returns the OrthoConfig error when a layer holds an invalid value.
    pub fn from_environment() -> OrthoResult<Self> {
        Self::load_from_iter([OsString::from(env!("CARGO_PKG_NAME"))])
    }

    /// Cooldown window.
    pub fn cooldown(&self) -> TimeDelta {
        TimeDelta::hours(i64::from(self.cooldown_hours))
    }

    /// Fan-out width, clamped to `1..=MAX_FANOUT_CONCURRENCY`.
    pub fn fanout_concurrency(&self) -> usize {
        self.fanout_concurrency.clamp(1, MAX_FANOUT_CONCURRENCY)
    }

    /// Per-call enrichment timeout, at least one second.
    pub fn enrichment_timeout(&self) -> Duration {
        Duration::from_secs(self.enrichment_timeout_secs.max(1))
    }

    /// Configured endpoint, ignoring blank values.
    pub fn enrichment_endpoint(&self) -> Option<&str> {
        self.enrichment_endpoint
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// Service configuration derived from these settings.
    pub fn service_config(&self) -> DemoProvisioningConfig {
        DemoProvisioningConfig {
            cooldown: self.cooldown(),
            fanout: FanoutConfig {
                max_concurrency: self.fanout_concurrency(),
                call_timeout: self.enrichment_timeout(),
            },
            response_seed: None,
        }
    }
}
