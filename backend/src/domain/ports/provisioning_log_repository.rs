//! Port abstraction for the per-tenant provisioning log.
//!
//! The log is the sole input to the cooldown decision. Adapters must make
//! [`ProvisioningLogRepository::try_claim_run`] atomic so two concurrent
//! requests for the same tenant cannot both pass the cooldown check.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};

use super::define_port_error;
use crate::domain::TenantId;

define_port_error! {
    /// Persistence errors raised by provisioning log adapters.
    pub enum ProvisioningLogRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "provisioning log connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "provisioning log query failed: {message}",
    }
}

/// Lifecycle marker stored on each log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProvisioningOutcome {
    /// Run claimed; written before any mutation.
    Started,
    /// Run completed and counts are recorded.
    Succeeded,
    /// Run aborted; the error message is recorded.
    Failed,
}

impl ProvisioningOutcome {
    /// Stable storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }

    /// Parse the storage representation.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "started" => Some(Self::Started),
            "succeeded" => Some(Self::Succeeded),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Record counts reported by a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProvisioningCounts {
    pub clients: u32,
    pub staff: u32,
    pub assessments: u32,
    pub insights: u32,
}

/// One append-only entry in the provisioning log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningLogEntry {
    pub tenant_id: TenantId,
    pub recorded_at: DateTime<Utc>,
    pub outcome: ProvisioningOutcome,
    pub counts: Option<ProvisioningCounts>,
    pub error_message: Option<String>,
}

impl ProvisioningLogEntry {
    /// Entry written when a run claims the cooldown slot.
    pub fn started(tenant_id: TenantId, recorded_at: DateTime<Utc>) -> Self {
        Self {
            tenant_id,
            recorded_at,
            outcome: ProvisioningOutcome::Started,
            counts: None,
            error_message: None,
        }
    }

    /// Entry written after a successful run.
    pub fn succeeded(
        tenant_id: TenantId,
        recorded_at: DateTime<Utc>,
        counts: ProvisioningCounts,
    ) -> Self {
        Self {
            tenant_id,
            recorded_at,
            outcome: ProvisioningOutcome::Succeeded,
            counts: Some(counts),
            error_message: None,
        }
    }

    /// Entry written after an aborted run.
    pub fn failed(
        tenant_id: TenantId,
        recorded_at: DateTime<Utc>,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id,
            recorded_at,
            outcome: ProvisioningOutcome::Failed,
            counts: None,
            error_message: Some(error_message.into()),
        }
    }
}

/// Result of an atomic cooldown claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimResult {
    /// No entry inside the window; a `started` entry was written.
    Claimed,
    /// The most recent entry is still inside the window.
    CoolingDown { last_run_at: DateTime<Utc> },
}

/// Port for reading and appending provisioning log entries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProvisioningLogRepository: Send + Sync {
    /// Most recent entry for the tenant, if any.
    async fn latest_entry(
        &self,
        tenant_id: &TenantId,
    ) -> Result<Option<ProvisioningLogEntry>, ProvisioningLogRepositoryError>;

    /// Claim a run when the latest entry is older than `window`.
    ///
    /// On success a `started` entry stamped with `now` is appended in the
    /// same atomic unit as the check.
    async fn try_claim_run(
        &self,
        tenant_id: &TenantId,
        now: DateTime<Utc>,
        window: TimeDelta,
    ) -> Result<ClaimResult, ProvisioningLogRepositoryError>;

    /// Append an entry.
    async fn append(
        &self,
        entry: &ProvisioningLogEntry,
    ) -> Result<(), ProvisioningLogRepositoryError>;
}

/// In-memory log for tests and database-less runs.
#[derive(Debug, Default, Clone)]
pub struct FixtureProvisioningLogRepository {
    entries: Arc<Mutex<Vec<ProvisioningLogEntry>>>,
}

impl FixtureProvisioningLogRepository {
    /// Snapshot of every entry appended so far.
    pub fn entries(&self) -> Vec<ProvisioningLogEntry> {
        self.entries
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, Vec<ProvisioningLogEntry>>, ProvisioningLogRepositoryError>
    {
        self.entries
            .lock()
            .map_err(|_| ProvisioningLogRepositoryError::connection("fixture log poisoned"))
    }
}

fn latest_for<'a>(
    entries: &'a [ProvisioningLogEntry],
    tenant_id: &TenantId,
) -> Option<&'a ProvisioningLogEntry> {
    entries
        .iter()
        .filter(|entry| entry.tenant_id == *tenant_id)
        .max_by_key(|entry| entry.recorded_at)
}

#[async_trait]
impl ProvisioningLogRepository for FixtureProvisioningLogRepository {
    async fn latest_entry(
        &self,
        tenant_id: &TenantId,
    ) -> Result<Option<ProvisioningLogEntry>, ProvisioningLogRepositoryError> {
        let entries = self.lock()?;
        Ok(latest_for(&entries, tenant_id).cloned())
    }

    async fn try_claim_run(
        &self,
        tenant_id: &TenantId,
        now: DateTime<Utc>,
        window: TimeDelta,
    ) -> Result<ClaimResult, ProvisioningLogRepositoryError> {
        let mut entries = self.lock()?;
        let blocking = latest_for(&entries, tenant_id)
            .map(|latest| latest.recorded_at)
            .filter(|recorded_at| now - *recorded_at < window);
        if let Some(last_run_at) = blocking {
            return Ok(ClaimResult::CoolingDown { last_run_at });
        }
        entries.push(ProvisioningLogEntry::started(*tenant_id, now));
        Ok(ClaimResult::Claimed)
    }

    async fn append(
        &self,
        entry: &ProvisioningLogEntry,
    ) -> Result<(), ProvisioningLogRepositoryError> {
        self.lock()?.push(entry.clone());
        Ok(())
    }
}
