//! Per-tenant cooldown between provisioning runs.
//!
//! The guard reads the provisioning log through its port. Provisioning uses
//! [`CooldownGuard::claim`], which checks and records the run in one atomic
//! step; [`CooldownGuard::check`] is a read-only probe for status reporting.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::TenantId;
use crate::domain::ports::{ClaimResult, ProvisioningLogRepository, ProvisioningLogRepositoryError};

/// Default wait between two runs for one tenant.
pub const DEFAULT_COOLDOWN_HOURS: u32 = 24;

const SECONDS_PER_HOUR: u64 = 3_600;

/// Outcome of a cooldown evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownDecision {
    /// The tenant may provision now.
    Allowed,
    /// The tenant must wait; hours are rounded up.
    RateLimited {
        retry_after_hours: u32,
        last_run_at: DateTime<Utc>,
    },
}

/// Cooldown guard backed by the provisioning log.
pub struct CooldownGuard<L: ?Sized> {
    log: Arc<L>,
    clock: Arc<dyn Clock>,
    window: TimeDelta,
}

impl<L: ?Sized> Clone for CooldownGuard<L> {
    fn clone(&self) -> Self {
        Self {
            log: Arc::clone(&self.log),
            clock: Arc::clone(&self.clock),
            window: self.window,
        }
    }
}

impl<L> CooldownGuard<L>
where
    L: ProvisioningLogRepository + ?Sized,
{
    /// Create a guard with an explicit window.
    pub fn new(log: Arc<L>, clock: Arc<dyn Clock>, window: TimeDelta) -> Self {
        Self { log, clock, window }
    }

    /// Configured cooldown window.
    pub fn window(&self) -> TimeDelta {
        self.window
    }

    /// Evaluate the cooldown without recording anything.
    pub async fn check(
        &self,
        tenant_id: &TenantId,
    ) -> Result<CooldownDecision, ProvisioningLogRepositoryError> {
        let now = self.clock.utc();
        let latest = self.log.latest_entry(tenant_id).await?;
        let decision = match latest {
            Some(entry) if now - entry.recorded_at < self.window => {
                self.rate_limited(now, entry.recorded_at)
            }
            _ => CooldownDecision::Allowed,
        };
        debug!(%tenant_id, ?decision, "cooldown checked");
        Ok(decision)
    }

    /// Atomically check the cooldown and record a started run.
    pub async fn claim(
        &self,
        tenant_id: &TenantId,
    ) -> Result<CooldownDecision, ProvisioningLogRepositoryError> {
        let now = self.clock.utc();
        let decision = match self.log.try_claim_run(tenant_id, now, self.window).await? {
            ClaimResult::Claimed => CooldownDecision::Allowed,
            ClaimResult::CoolingDown { last_run_at } => self.rate_limited(now, last_run_at),
        };
        info!(%tenant_id, ?decision, "cooldown claim evaluated");
        Ok(decision)
    }

    fn rate_limited(&self, now: DateTime<Utc>, last_run_at: DateTime<Utc>) -> CooldownDecision {
        let remaining = self.window - (now - last_run_at);
        CooldownDecision::RateLimited {
            retry_after_hours: retry_after_hours(remaining, self.window),
            last_run_at,
        }
    }
}

/// Round the remaining wait up to whole hours.
///
/// Clock skew can make `remaining` exceed the window; it is clamped so the
/// caller never waits longer than one full window. The result is at least 1.
pub fn retry_after_hours(remaining: TimeDelta, window: TimeDelta) -> u32 {
    let clamped = remaining.clamp(TimeDelta::zero(), window);
    let seconds = u64::try_from(clamped.num_seconds()).unwrap_or(0);
    let hours = seconds.div_ceil(SECONDS_PER_HOUR).max(1);
    u32::try_from(hours).unwrap_or(u32::MAX)
}
