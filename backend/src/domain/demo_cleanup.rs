//! Ordered purge of a tenant's previous demo dataset.
//!
//! Children go before parents. Child stages are best-effort; a failure while
//! deleting clients or staff aborts provisioning because composing on top of
//! surviving parents would collide on unique identities.

use std::fmt;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::domain::TenantId;
use crate::domain::ports::{DemoDataRepository, DemoDataRepositoryError};

/// One deletion step of the cascading cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CleanupStage {
    InsightDocuments,
    Assessments,
    EngagementEvents,
    Clients,
    Staff,
}

impl CleanupStage {
    /// Execution order.
    pub const ORDER: [Self; 5] = [
        Self::InsightDocuments,
        Self::Assessments,
        Self::EngagementEvents,
        Self::Clients,
        Self::Staff,
    ];

    /// Whether a failure at this stage aborts provisioning.
    pub const fn is_fatal(self) -> bool {
        matches!(self, Self::Clients | Self::Staff)
    }

    /// Stable label used in logs and error details.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InsightDocuments => "insight_documents",
            Self::Assessments => "assessments",
            Self::EngagementEvents => "engagement_events",
            Self::Clients => "clients",
            Self::Staff => "staff",
        }
    }
}

impl fmt::Display for CleanupStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rows removed per stage and the child stages that failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub deleted: Vec<(CleanupStage, u64)>,
    pub skipped: Vec<CleanupStage>,
}

impl CleanupReport {
    /// Rows deleted by a stage, if it ran successfully.
    pub fn deleted_at(&self, stage: CleanupStage) -> Option<u64> {
        self.deleted
            .iter()
            .find(|(candidate, _)| *candidate == stage)
            .map(|(_, count)| *count)
    }
}

/// Fatal cleanup failure at a parent stage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cleanup failed at {stage}: {source}")]
pub struct CleanupFailure {
    pub stage: CleanupStage,
    #[source]
    pub source: DemoDataRepositoryError,
}

/// Cascading cleanup engine.
pub struct DemoCleanup<D: ?Sized> {
    store: Arc<D>,
}

impl<D: ?Sized> Clone for DemoCleanup<D> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<D> DemoCleanup<D>
where
    D: DemoDataRepository + ?Sized,
{
    /// Create a cleanup engine over the demo data store.
    pub fn new(store: Arc<D>) -> Self {
        Self { store }
    }

    /// Delete every demo-tagged row for the tenant in dependency order.
    pub async fn purge(&self, tenant_id: &TenantId) -> Result<CleanupReport, CleanupFailure> {
        let mut report = CleanupReport::default();
        for stage in CleanupStage::ORDER {
            match self.delete_stage(stage, tenant_id).await {
                Ok(count) => {
                    info!(%tenant_id, %stage, deleted = count, "cleanup stage completed");
                    report.deleted.push((stage, count));
                }
                Err(source) if stage.is_fatal() => {
                    error!(%tenant_id, %stage, error = %source, "cleanup stage failed");
                    return Err(CleanupFailure { stage, source });
                }
                Err(source) => {
                    warn!(%tenant_id, %stage, error = %source, "cleanup stage skipped");
                    report.skipped.push(stage);
                }
            }
        }
        Ok(report)
    }

    async fn delete_stage(
        &self,
        stage: CleanupStage,
        tenant_id: &TenantId,
    ) -> Result<u64, DemoDataRepositoryError> {
        match stage {
            CleanupStage::InsightDocuments => self.store.delete_insight_documents(tenant_id).await,
            CleanupStage::Assessments => self.store.delete_assessments(tenant_id).await,
            CleanupStage::EngagementEvents => self.store.delete_engagement_events(tenant_id).await,
            CleanupStage::Clients => self.store.delete_clients(tenant_id).await,
            CleanupStage::Staff => self.store.delete_staff(tenant_id).await,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::MockDemoDataRepository;
    use mockall::Sequence;
    use rstest::rstest;

    fn query_error() -> DemoDataRepositoryError {
        DemoDataRepositoryError::query("relation locked")
    }

    #[rstest]
    #[tokio::test]
    async fn deletes_children_before_parents() {
        let mut store = MockDemoDataRepository::new();
        let mut seq = Sequence::new();
        store
            .expect_delete_insight_documents()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(4));
        store
            .expect_delete_assessments()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(3));
        store
            .expect_delete_engagement_events()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(2));
        store
            .expect_delete_clients()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(3));
        store
            .expect_delete_staff()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(5));

        let report = DemoCleanup::new(Arc::new(store))
            .purge(&TenantId::random())
            .await
            .expect("cleanup succeeds");

        assert_eq!(report.deleted_at(CleanupStage::InsightDocuments), Some(4));
        assert_eq!(report.deleted_at(CleanupStage::Staff), Some(5));
        assert!(report.skipped.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn child_stage_failures_are_skipped() {
        let mut store = MockDemoDataRepository::new();
        store
            .expect_delete_insight_documents()
            .returning(|_| Err(query_error()));
        store
            .expect_delete_assessments()
            .returning(|_| Ok(1));
        store
            .expect_delete_engagement_events()
            .returning(|_| Err(query_error()));
        store.expect_delete_clients().returning(|_| Ok(1));
        store.expect_delete_staff().returning(|_| Ok(1));

        let report = DemoCleanup::new(Arc::new(store))
            .purge(&TenantId::random())
            .await
            .expect("child failures are tolerated");

        assert_eq!(
            report.skipped,
            vec![CleanupStage::InsightDocuments, CleanupStage::EngagementEvents]
        );
        assert_eq!(report.deleted_at(CleanupStage::Clients), Some(1));
    }

    #[rstest]
    #[tokio::test]
    async fn client_stage_failure_aborts_before_staff() {
        let mut store = MockDemoDataRepository::new();
        store.expect_delete_insight_documents().returning(|_| Ok(0));
        store.expect_delete_assessments().returning(|_| Ok(0));
        store.expect_delete_engagement_events().returning(|_| Ok(0));
        store
            .expect_delete_clients()
            .returning(|_| Err(query_error()));
        store.expect_delete_staff().never();

        let failure = DemoCleanup::new(Arc::new(store))
            .purge(&TenantId::random())
            .await
            .expect_err("parent failure is fatal");

        assert_eq!(failure.stage, CleanupStage::Clients);
        assert_eq!(failure.source, query_error());
    }

    #[rstest]
    #[tokio::test]
    async fn staff_stage_failure_is_fatal() {
        let mut store = MockDemoDataRepository::new();
        store.expect_delete_insight_documents().returning(|_| Ok(0));
        store.expect_delete_assessments().returning(|_| Ok(0));
        store.expect_delete_engagement_events().returning(|_| Ok(0));
        store.expect_delete_clients().returning(|_| Ok(0));
        store
            .expect_delete_staff()
            .returning(|_| Err(DemoDataRepositoryError::connection("reset")));

        let failure = DemoCleanup::new(Arc::new(store))
            .purge(&TenantId::random())
            .await
            .expect_err("parent failure is fatal");

        assert_eq!(failure.stage, CleanupStage::Staff);
        assert_eq!(
            failure.to_string(),
            "cleanup failed at staff: demo data connection failed: reset"
        );
    }

    #[rstest]
    #[case(CleanupStage::InsightDocuments, false)]
    #[case(CleanupStage::Assessments, false)]
    #[case(CleanupStage::EngagementEvents, false)]
    #[case(CleanupStage::Clients, true)]
    #[case(CleanupStage::Staff, true)]
    fn only_parent_stages_are_fatal(#[case] stage: CleanupStage, #[case] fatal: bool) {
        assert_eq!(stage.is_fatal(), fatal);
    }
}
