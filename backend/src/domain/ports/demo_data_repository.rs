//! Port abstraction for tenant demo records.
//!
//! Deletes only ever touch rows tagged with the demo source; rows created by
//! real users survive a reset.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{
    AssessmentRecord, DemoDataCounts, InsightDocument, SyntheticClientRecord,
    SyntheticStaffRecord, TenantId,
};

define_port_error! {
    /// Persistence errors raised by demo data adapters.
    pub enum DemoDataRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "demo data connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "demo data query failed: {message}",
        /// A uniqueness constraint rejected the write.
        Conflict { message: String } => "demo data conflict: {message}",
    }
}

/// Port for purging and inserting demo records for one tenant.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DemoDataRepository: Send + Sync {
    /// Delete insight documents attached to demo clients.
    async fn delete_insight_documents(
        &self,
        tenant_id: &TenantId,
    ) -> Result<u64, DemoDataRepositoryError>;

    /// Delete assessments attached to demo clients.
    async fn delete_assessments(&self, tenant_id: &TenantId)
    -> Result<u64, DemoDataRepositoryError>;

    /// Delete engagement events attached to demo clients.
    async fn delete_engagement_events(
        &self,
        tenant_id: &TenantId,
    ) -> Result<u64, DemoDataRepositoryError>;

    /// Delete demo clients.
    async fn delete_clients(&self, tenant_id: &TenantId) -> Result<u64, DemoDataRepositoryError>;

    /// Delete demo staff.
    async fn delete_staff(&self, tenant_id: &TenantId) -> Result<u64, DemoDataRepositoryError>;

    /// Insert a batch of clients atomically.
    async fn insert_clients(
        &self,
        records: &[SyntheticClientRecord],
    ) -> Result<(), DemoDataRepositoryError>;

    /// Insert a batch of staff atomically.
    async fn insert_staff(
        &self,
        records: &[SyntheticStaffRecord],
    ) -> Result<(), DemoDataRepositoryError>;

    /// Insert a batch of assessments atomically.
    async fn insert_assessments(
        &self,
        records: &[AssessmentRecord],
    ) -> Result<(), DemoDataRepositoryError>;

    /// Store the settled insight documents for the tenant's clients.
    async fn insert_insight_documents(
        &self,
        tenant_id: &TenantId,
        documents: &[InsightDocument],
    ) -> Result<(), DemoDataRepositoryError>;

    /// Count demo records currently stored for the tenant.
    async fn demo_counts(&self, tenant_id: &TenantId)
    -> Result<DemoDataCounts, DemoDataRepositoryError>;
}

/// Fixture implementation that accepts every write and stores nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDemoDataRepository;

#[async_trait]
impl DemoDataRepository for FixtureDemoDataRepository {
    async fn delete_insight_documents(
        &self,
        _tenant_id: &TenantId,
    ) -> Result<u64, DemoDataRepositoryError> {
        Ok(0)
    }

    async fn delete_assessments(
        &self,
        _tenant_id: &TenantId,
    ) -> Result<u64, DemoDataRepositoryError> {
        Ok(0)
    }

    async fn delete_engagement_events(
        &self,
        _tenant_id: &TenantId,
    ) -> Result<u64, DemoDataRepositoryError> {
        Ok(0)
    }

    async fn delete_clients(&self, _tenant_id: &TenantId) -> Result<u64, DemoDataRepositoryError> {
        Ok(0)
    }

    async fn delete_staff(&self, _tenant_id: &TenantId) -> Result<u64, DemoDataRepositoryError> {
        Ok(0)
    }

    async fn insert_clients(
        &self,
        _records: &[SyntheticClientRecord],
    ) -> Result<(), DemoDataRepositoryError> {
        Ok(())
    }

    async fn insert_staff(
        &self,
        _records: &[SyntheticStaffRecord],
    ) -> Result<(), DemoDataRepositoryError> {
        Ok(())
    }

    async fn insert_assessments(
        &self,
        _records: &[AssessmentRecord],
    ) -> Result<(), DemoDataRepositoryError> {
        Ok(())
    }

    async fn insert_insight_documents(
        &self,
        _tenant_id: &TenantId,
        _documents: &[InsightDocument],
    ) -> Result<(), DemoDataRepositoryError> {
        Ok(())
    }

    async fn demo_counts(
        &self,
        _tenant_id: &TenantId,
    ) -> Result<DemoDataCounts, DemoDataRepositoryError> {
        Ok(DemoDataCounts::default())
    }
}
