//! Best-effort audit entries for finished provisioning runs.

use std::sync::Arc;

use mockable::Clock;
use tracing::{debug, warn};

use crate::domain::TenantId;
use crate::domain::ports::{ProvisioningCounts, ProvisioningLogEntry, ProvisioningLogRepository};

/// Operation logger appending outcome entries to the provisioning log.
pub struct ProvisioningLogger<L: ?Sized> {
    log: Arc<L>,
    clock: Arc<dyn Clock>,
}

impl<L: ?Sized> Clone for ProvisioningLogger<L> {
    fn clone(&self) -> Self {
        Self {
            log: Arc::clone(&self.log),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<L> ProvisioningLogger<L>
where
    L: ProvisioningLogRepository + ?Sized,
{
    /// Create a logger over the provisioning log.
    pub fn new(log: Arc<L>, clock: Arc<dyn Clock>) -> Self {
        Self { log, clock }
    }

    /// Record a completed run. Append errors are logged and swallowed.
    pub async fn record_success(&self, tenant_id: &TenantId, counts: ProvisioningCounts) {
        let entry = ProvisioningLogEntry::succeeded(*tenant_id, self.clock.utc(), counts);
        self.append(&entry).await;
    }

    /// Record an aborted run. Append errors are logged and swallowed.
    pub async fn record_failure(&self, tenant_id: &TenantId, message: &str) {
        let entry = ProvisioningLogEntry::failed(*tenant_id, self.clock.utc(), message);
        self.append(&entry).await;
    }

    async fn append(&self, entry: &ProvisioningLogEntry) {
        match self.log.append(entry).await {
            Ok(()) => debug!(
                tenant_id = %entry.tenant_id,
                outcome = entry.outcome.as_str(),
                "provisioning log entry appended"
            ),
            Err(error) => warn!(
                tenant_id = %entry.tenant_id,
                outcome = entry.outcome.as_str(),
                %error,
                "provisioning log append failed"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{
        FixtureProvisioningLogRepository, MockProvisioningLogRepository,
        ProvisioningLogRepositoryError, ProvisioningOutcome,
    };
    use crate::test_support::MutableClock;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn clock() -> Arc<MutableClock> {
        let start = Utc
            .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp");
        Arc::new(MutableClock::new(start))
    }

    #[rstest]
    #[tokio::test]
    async fn success_entry_carries_counts() {
        let log = Arc::new(FixtureProvisioningLogRepository::default());
        let logger = ProvisioningLogger::new(Arc::clone(&log), clock());
        let tenant = TenantId::random();
        let counts = ProvisioningCounts {
            clients: 25,
            staff: 25,
            assessments: 25,
            insights: 20,
        };

        logger.record_success(&tenant, counts).await;

        let entries = log.entries();
        let entry = entries.first().expect("entry appended");
        assert_eq!(entry.outcome, ProvisioningOutcome::Succeeded);
        assert_eq!(entry.counts, Some(counts));
    }

    #[rstest]
    #[tokio::test]
    async fn failure_entry_carries_message() {
        let log = Arc::new(FixtureProvisioningLogRepository::default());
        let logger = ProvisioningLogger::new(Arc::clone(&log), clock());

        logger
            .record_failure(&TenantId::random(), "cleanup failed at clients")
            .await;

        let entries = log.entries();
        let entry = entries.first().expect("entry appended");
        assert_eq!(entry.outcome, ProvisioningOutcome::Failed);
        assert_eq!(entry.error_message.as_deref(), Some("cleanup failed at clients"));
    }

    #[rstest]
    #[tokio::test]
    async fn append_errors_are_swallowed() {
        let mut log = MockProvisioningLogRepository::new();
        log.expect_append()
            .times(1)
            .returning(|_| Err(ProvisioningLogRepositoryError::query("disk full")));
        let logger = ProvisioningLogger::new(Arc::new(log), clock());

        logger
            .record_success(&TenantId::random(), ProvisioningCounts::default())
            .await;
    }
}
