//! Expansion of archetype catalogs into tenant records.
//!
//! Planning is pure apart from fresh row ids and the clock; persistence runs
//! clients, then staff, then assessments. Each stage is a single batch, so a
//! failure leaves earlier stages committed and the failure reports them.

use std::fmt;
use std::sync::Arc;

use demo_catalog::{ArchetypeCatalog, IdentityKind, ResponseSynthesizer, synthetic_identity};
use mockable::Clock;
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::domain::ports::{DemoDataRepository, DemoDataRepositoryError};
use crate::domain::{AssessmentRecord, SyntheticClientRecord, SyntheticStaffRecord, TenantId};

/// One persistence stage of the composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionStage {
    Clients,
    Staff,
    Assessments,
}

impl CompositionStage {
    /// Stable label used in logs and error details.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clients => "clients",
            Self::Staff => "staff",
            Self::Assessments => "assessments",
        }
    }
}

impl fmt::Display for CompositionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rows committed by completed stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommittedCounts {
    pub clients: u32,
    pub staff: u32,
    pub assessments: u32,
}

/// Fatal persistence failure during composition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("composition failed at {stage}: {source}")]
pub struct CompositionFailure {
    pub stage: CompositionStage,
    pub committed: CommittedCounts,
    #[source]
    pub source: DemoDataRepositoryError,
}

/// Records planned for one provisioning run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedDataset {
    pub clients: Vec<SyntheticClientRecord>,
    pub staff: Vec<SyntheticStaffRecord>,
    pub assessments: Vec<AssessmentRecord>,
}

/// Dataset composer.
pub struct DemoComposer<D: ?Sized> {
    store: Arc<D>,
    clock: Arc<dyn Clock>,
}

impl<D: ?Sized> Clone for DemoComposer<D> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
        }
    }
}

fn count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

impl<D> DemoComposer<D>
where
    D: DemoDataRepository + ?Sized,
{
    /// Create a composer writing through the demo data store.
    pub fn new(store: Arc<D>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Expand the catalog into records for the tenant.
    ///
    /// Identities depend only on the tenant, the catalog entry and its
    /// position. Assessment scores are copied from the archetype; the
    /// synthesised responses do not influence them.
    pub fn plan(
        &self,
        tenant_id: &TenantId,
        catalog: &ArchetypeCatalog,
        synthesizer: &mut ResponseSynthesizer,
    ) -> ComposedDataset {
        let created_at = self.clock.utc();
        let tenant = *tenant_id.as_uuid();

        let clients: Vec<SyntheticClientRecord> = catalog
            .clients()
            .iter()
            .enumerate()
            .map(|(index, archetype)| SyntheticClientRecord {
                id: Uuid::new_v4(),
                tenant_id: *tenant_id,
                display_name: archetype.display_name().to_owned(),
                unique_identity: synthetic_identity(
                    archetype.base_identity(),
                    tenant,
                    IdentityKind::Client,
                    index,
                ),
                organization: archetype.organization().map(str::to_owned),
                personality_type: archetype.personality_type(),
                score_vector: archetype.score_vector(),
                created_at,
            })
            .collect();

        let staff = catalog
            .staff()
            .iter()
            .enumerate()
            .map(|(index, archetype)| SyntheticStaffRecord {
                id: Uuid::new_v4(),
                tenant_id: *tenant_id,
                display_name: archetype.display_name().to_owned(),
                unique_identity: synthetic_identity(
                    archetype.base_identity(),
                    tenant,
                    IdentityKind::Staff,
                    index,
                ),
                role: archetype.role().map(str::to_owned),
                personality_type: archetype.personality_type(),
                score_vector: archetype.score_vector(),
                created_at,
            })
            .collect();

        let assessments = clients
            .iter()
            .map(|client| AssessmentRecord {
                id: Uuid::new_v4(),
                client_id: client.id,
                tenant_id: *tenant_id,
                response_set: synthesizer.synthesize(client.personality_type),
                score_vector: client.score_vector,
                dominant_type: client.personality_type,
                created_at,
            })
            .collect();

        ComposedDataset {
            clients,
            staff,
            assessments,
        }
    }

    /// Persist a planned dataset stage by stage.
    pub async fn compose(
        &self,
        dataset: &ComposedDataset,
    ) -> Result<CommittedCounts, CompositionFailure> {
        let mut committed = CommittedCounts::default();

        self.store
            .insert_clients(&dataset.clients)
            .await
            .map_err(|source| Self::fail(CompositionStage::Clients, committed, source))?;
        committed.clients = count(dataset.clients.len());
        info!(clients = committed.clients, "demo clients created");

        self.store
            .insert_staff(&dataset.staff)
            .await
            .map_err(|source| Self::fail(CompositionStage::Staff, committed, source))?;
        committed.staff = count(dataset.staff.len());
        info!(staff = committed.staff, "demo staff created");

        self.store
            .insert_assessments(&dataset.assessments)
            .await
            .map_err(|source| Self::fail(CompositionStage::Assessments, committed, source))?;
        committed.assessments = count(dataset.assessments.len());
        info!(assessments = committed.assessments, "demo assessments created");

        Ok(committed)
    }

    fn fail(
        stage: CompositionStage,
        committed: CommittedCounts,
        source: DemoDataRepositoryError,
    ) -> CompositionFailure {
        error!(%stage, ?committed, error = %source, "composition stage failed");
        CompositionFailure {
            stage,
            committed,
            source,
        }
    }
}
