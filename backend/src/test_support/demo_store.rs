//! In-memory demo data store with failure injection.
//!
//! Mirrors the relational adapter's contract: identities are unique across
//! every tenant, batches are all-or-nothing and deletes only touch rows
//! tagged with the demo source.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use demo_catalog::{PersonalityType, ScoreVector};
use uuid::Uuid;

use crate::domain::ports::{DemoDataRepository, DemoDataRepositoryError};
use crate::domain::{
    AssessmentRecord, DEMO_SOURCE, DemoDataCounts, InsightDocument, InsightStatus,
    SyntheticClientRecord, SyntheticStaffRecord, TenantId,
};

/// Store operation that can be forced to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailurePoint {
    DeleteInsightDocuments,
    DeleteAssessments,
    DeleteEngagementEvents,
    DeleteClients,
    DeleteStaff,
    InsertClients,
    InsertStaff,
    InsertAssessments,
    InsertInsightDocuments,
}

#[derive(Debug, Clone)]
struct Tagged<T> {
    record: T,
    source: &'static str,
}

#[derive(Debug, Clone, Copy)]
struct ChildRow {
    tenant_id: TenantId,
    client_id: Uuid,
}

#[derive(Debug, Clone, Copy)]
struct InsightRow {
    tenant_id: TenantId,
    client_id: Uuid,
    status: InsightStatus,
}

#[derive(Debug, Default)]
struct StoreState {
    clients: Vec<Tagged<SyntheticClientRecord>>,
    staff: Vec<Tagged<SyntheticStaffRecord>>,
    assessments: Vec<AssessmentRecord>,
    insight_documents: Vec<InsightRow>,
    engagement_events: Vec<ChildRow>,
    failures: HashSet<FailurePoint>,
}

impl StoreState {
    fn demo_client_ids(&self, tenant_id: &TenantId) -> HashSet<Uuid> {
        self.clients
            .iter()
            .filter(|row| row.source == DEMO_SOURCE && row.record.tenant_id == *tenant_id)
            .map(|row| row.record.id)
            .collect()
    }

    fn identity_taken(&self, identity: &str) -> bool {
        self.clients
            .iter()
            .any(|row| row.record.unique_identity == identity)
            || self
                .staff
                .iter()
                .any(|row| row.record.unique_identity == identity)
    }

    fn check(&self, point: FailurePoint) -> Result<(), DemoDataRepositoryError> {
        if self.failures.contains(&point) {
            Err(DemoDataRepositoryError::query(format!(
                "injected failure at {point:?}"
            )))
        } else {
            Ok(())
        }
    }
}

/// Shared in-memory store for demo records.
#[derive(Debug, Default)]
pub struct InMemoryDemoStore {
    state: Mutex<StoreState>,
}

fn to_u64(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

impl InMemoryDemoStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Force an operation to fail until [`Self::clear_failures`] is called.
    pub fn fail_on(&self, point: FailurePoint) {
        self.lock().failures.insert(point);
    }

    /// Remove every injected failure.
    pub fn clear_failures(&self) {
        self.lock().failures.clear();
    }

    /// Add a client that was not created by the provisioner.
    pub fn insert_organic_client(&self, tenant_id: TenantId, display_name: &str) -> Uuid {
        let id = Uuid::new_v4();
        let record = SyntheticClientRecord {
            id,
            tenant_id,
            display_name: display_name.to_owned(),
            unique_identity: format!("{id}@customer.example"),
            organization: None,
            personality_type: PersonalityType::S,
            score_vector: ScoreVector::new(15, 20, 45, 20),
            created_at: Utc::now(),
        };
        self.lock().clients.push(Tagged {
            record,
            source: "organic",
        });
        id
    }

    /// Attach a succeeded insight document to a client.
    pub fn insert_insight_document(&self, tenant_id: TenantId, client_id: Uuid) {
        self.lock().insight_documents.push(InsightRow {
            tenant_id,
            client_id,
            status: InsightStatus::Succeeded,
        });
    }

    /// Stored insight documents for the tenant with the given status.
    pub fn insight_document_count(&self, tenant_id: &TenantId, status: InsightStatus) -> usize {
        self.lock()
            .insight_documents
            .iter()
            .filter(|row| row.tenant_id == *tenant_id && row.status == status)
            .count()
    }

    /// Attach an engagement event to a client.
    pub fn insert_engagement_event(&self, tenant_id: TenantId, client_id: Uuid) {
        self.lock().engagement_events.push(ChildRow {
            tenant_id,
            client_id,
        });
    }

    /// Demo clients currently stored for the tenant.
    pub fn demo_clients(&self, tenant_id: &TenantId) -> Vec<SyntheticClientRecord> {
        self.lock()
            .clients
            .iter()
            .filter(|row| row.source == DEMO_SOURCE && row.record.tenant_id == *tenant_id)
            .map(|row| row.record.clone())
            .collect()
    }

    /// Demo staff currently stored for the tenant.
    pub fn demo_staff(&self, tenant_id: &TenantId) -> Vec<SyntheticStaffRecord> {
        self.lock()
            .staff
            .iter()
            .filter(|row| row.source == DEMO_SOURCE && row.record.tenant_id == *tenant_id)
            .map(|row| row.record.clone())
            .collect()
    }

    /// Assessments currently stored for the tenant.
    pub fn assessments(&self, tenant_id: &TenantId) -> Vec<AssessmentRecord> {
        self.lock()
            .assessments
            .iter()
            .filter(|record| record.tenant_id == *tenant_id)
            .cloned()
            .collect()
    }

    /// Clients of any source stored for the tenant.
    pub fn client_count(&self, tenant_id: &TenantId) -> usize {
        self.lock()
            .clients
            .iter()
            .filter(|row| row.record.tenant_id == *tenant_id)
            .count()
    }

    /// Engagement events stored for the tenant.
    pub fn engagement_event_count(&self, tenant_id: &TenantId) -> usize {
        self.lock()
            .engagement_events
            .iter()
            .filter(|row| row.tenant_id == *tenant_id)
            .count()
    }
}

#[async_trait]
impl DemoDataRepository for InMemoryDemoStore {
    async fn delete_insight_documents(
        &self,
        tenant_id: &TenantId,
    ) -> Result<u64, DemoDataRepositoryError> {
        let mut state = self.lock();
        state.check(FailurePoint::DeleteInsightDocuments)?;
        let owned = state.demo_client_ids(tenant_id);
        let before = state.insight_documents.len();
        state
            .insight_documents
            .retain(|row| row.tenant_id != *tenant_id || !owned.contains(&row.client_id));
        Ok(to_u64(before - state.insight_documents.len()))
    }

    async fn delete_assessments(
        &self,
        tenant_id: &TenantId,
    ) -> Result<u64, DemoDataRepositoryError> {
        let mut state = self.lock();
        state.check(FailurePoint::DeleteAssessments)?;
        let owned = state.demo_client_ids(tenant_id);
        let before = state.assessments.len();
        state
            .assessments
            .retain(|record| !owned.contains(&record.client_id));
        Ok(to_u64(before - state.assessments.len()))
    }

    async fn delete_engagement_events(
        &self,
        tenant_id: &TenantId,
    ) -> Result<u64, DemoDataRepositoryError> {
        let mut state = self.lock();
        state.check(FailurePoint::DeleteEngagementEvents)?;
        let owned = state.demo_client_ids(tenant_id);
        let before = state.engagement_events.len();
        state
            .engagement_events
            .retain(|row| row.tenant_id != *tenant_id || !owned.contains(&row.client_id));
        Ok(to_u64(before - state.engagement_events.len()))
    }

    async fn delete_clients(&self, tenant_id: &TenantId) -> Result<u64, DemoDataRepositoryError> {
        let mut state = self.lock();
        state.check(FailurePoint::DeleteClients)?;
        let owned = state.demo_client_ids(tenant_id);
        let before = state.clients.len();
        state
            .clients
            .retain(|row| !owned.contains(&row.record.id));
        // Children left behind by best-effort stages go with their parent.
        state
            .assessments
            .retain(|record| !owned.contains(&record.client_id));
        Ok(to_u64(before - state.clients.len()))
    }

    async fn delete_staff(&self, tenant_id: &TenantId) -> Result<u64, DemoDataRepositoryError> {
        let mut state = self.lock();
        state.check(FailurePoint::DeleteStaff)?;
        let before = state.staff.len();
        state
            .staff
            .retain(|row| row.source != DEMO_SOURCE || row.record.tenant_id != *tenant_id);
        Ok(to_u64(before - state.staff.len()))
    }

    async fn insert_clients(
        &self,
        records: &[SyntheticClientRecord],
    ) -> Result<(), DemoDataRepositoryError> {
        let mut state = self.lock();
        state.check(FailurePoint::InsertClients)?;
        if let Some(clash) = records
            .iter()
            .find(|record| state.identity_taken(&record.unique_identity))
        {
            return Err(DemoDataRepositoryError::conflict(format!(
                "identity {} already exists",
                clash.unique_identity
            )));
        }
        state
            .clients
            .extend(records.iter().cloned().map(|record| Tagged {
                record,
                source: DEMO_SOURCE,
            }));
        Ok(())
    }

    async fn insert_staff(
        &self,
        records: &[SyntheticStaffRecord],
    ) -> Result<(), DemoDataRepositoryError> {
        let mut state = self.lock();
        state.check(FailurePoint::InsertStaff)?;
        if let Some(clash) = records
            .iter()
            .find(|record| state.identity_taken(&record.unique_identity))
        {
            return Err(DemoDataRepositoryError::conflict(format!(
                "identity {} already exists",
                clash.unique_identity
            )));
        }
        state.staff.extend(records.iter().cloned().map(|record| Tagged {
            record,
            source: DEMO_SOURCE,
        }));
        Ok(())
    }

    async fn insert_assessments(
        &self,
        records: &[AssessmentRecord],
    ) -> Result<(), DemoDataRepositoryError> {
        let mut state = self.lock();
        state.check(FailurePoint::InsertAssessments)?;
        let assessed: HashSet<Uuid> = state
            .assessments
            .iter()
            .map(|record| record.client_id)
            .collect();
        if let Some(clash) = records
            .iter()
            .find(|record| assessed.contains(&record.client_id))
        {
            return Err(DemoDataRepositoryError::conflict(format!(
                "client {} already has an assessment",
                clash.client_id
            )));
        }
        state.assessments.extend(records.iter().cloned());
        Ok(())
    }

    async fn insert_insight_documents(
        &self,
        tenant_id: &TenantId,
        documents: &[InsightDocument],
    ) -> Result<(), DemoDataRepositoryError> {
        let mut state = self.lock();
        state.check(FailurePoint::InsertInsightDocuments)?;
        state
            .insight_documents
            .extend(documents.iter().map(|document| InsightRow {
                tenant_id: *tenant_id,
                client_id: document.client_id,
                status: document.status,
            }));
        Ok(())
    }

    async fn demo_counts(
        &self,
        tenant_id: &TenantId,
    ) -> Result<DemoDataCounts, DemoDataRepositoryError> {
        let state = self.lock();
        let owned = state.demo_client_ids(tenant_id);
        let staff = state
            .staff
            .iter()
            .filter(|row| row.source == DEMO_SOURCE && row.record.tenant_id == *tenant_id)
            .count();
        let assessments = state
            .assessments
            .iter()
            .filter(|record| owned.contains(&record.client_id))
            .count();
        let insight_documents = state
            .insight_documents
            .iter()
            .filter(|row| owned.contains(&row.client_id))
            .count();
        Ok(DemoDataCounts {
            clients: to_u64(owned.len()),
            staff: to_u64(staff),
            assessments: to_u64(assessments),
            insight_documents: to_u64(insight_documents),
        })
    }
}
