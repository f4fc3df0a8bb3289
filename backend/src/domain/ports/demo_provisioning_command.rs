//! Driving port for resetting a tenant to a fresh demo dataset.
//!
//! Inbound adapters (HTTP handler, CLI) call this port with an
//! authenticated tenant; the domain decides whether the run may proceed.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, TenantId};

/// Counts reported to the caller after a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningSummary {
    pub clients_created: u32,
    pub staff_created: u32,
    pub assessments_created: u32,
    /// Successful insight generations; failures are excluded.
    pub insights_generated: u32,
}

/// Domain use-case port for demo provisioning.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DemoProvisioningCommand: Send + Sync {
    /// Purge previous demo data and provision a fresh dataset.
    async fn provision(&self, tenant_id: &TenantId) -> Result<ProvisioningSummary, Error>;
}

/// Fixture command reporting a full catalog without touching storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDemoProvisioningCommand;

#[async_trait]
impl DemoProvisioningCommand for FixtureDemoProvisioningCommand {
    async fn provision(&self, _tenant_id: &TenantId) -> Result<ProvisioningSummary, Error> {
        Ok(ProvisioningSummary {
            clients_created: 25,
            staff_created: 25,
            assessments_created: 25,
            insights_generated: 0,
        })
    }
}
