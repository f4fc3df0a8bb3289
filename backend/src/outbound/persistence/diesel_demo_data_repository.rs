//! PostgreSQL-backed store for provisioned demo records.
//!
//! Every delete is scoped to the tenant and to rows tagged with
//! [`DEMO_SOURCE`]; child tables are matched through the tenant's demo
//! client ids so organic clients keep their documents and events.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{DemoDataRepository, DemoDataRepositoryError};
use crate::domain::{
    AssessmentRecord, DEMO_SOURCE, DemoDataCounts, InsightDocument, SyntheticClientRecord,
    SyntheticStaffRecord, TenantId,
};

use super::diesel_error_mapping::{
    DieselFailure, classify_diesel_error, pool_error_message, row_count,
};
use super::models::{NewAssessmentRow, NewClientRow, NewInsightDocumentRow, NewStaffRow};
use super::pool::DbPool;
use super::schema::{assessments, demo_clients, demo_staff, engagement_events, insight_documents};

/// Diesel implementation of [`DemoDataRepository`].
#[derive(Clone)]
pub struct DieselDemoDataRepository {
    pool: DbPool,
}

impl DieselDemoDataRepository {
    /// Repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: super::pool::PoolError) -> DemoDataRepositoryError {
    DemoDataRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error, operation: &str) -> DemoDataRepositoryError {
    match classify_diesel_error(error, operation) {
        DieselFailure::Connection(message) => DemoDataRepositoryError::connection(message),
        DieselFailure::UniqueViolation(message) => DemoDataRepositoryError::conflict(message),
        DieselFailure::Query(message) => DemoDataRepositoryError::query(message),
    }
}

fn to_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

/// Ids of the tenant's provisioned clients, as a subselect.
macro_rules! demo_client_ids {
    ($tenant:expr) => {
        demo_clients::table
            .filter(demo_clients::tenant_id.eq($tenant))
            .filter(demo_clients::source.eq(DEMO_SOURCE))
            .select(demo_clients::id)
    };
}

#[async_trait]
impl DemoDataRepository for DieselDemoDataRepository {
    async fn delete_insight_documents(
        &self,
        tenant_id: &TenantId,
    ) -> Result<u64, DemoDataRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let tenant = *tenant_id.as_uuid();
        let deleted = diesel::delete(
            insight_documents::table
                .filter(insight_documents::tenant_id.eq(tenant))
                .filter(insight_documents::client_id.eq_any(demo_client_ids!(tenant))),
        )
        .execute(&mut conn)
        .await
        .map_err(|err| map_diesel_error(err, "delete insight documents"))?;
        Ok(row_count(deleted))
    }

    async fn delete_assessments(
        &self,
        tenant_id: &TenantId,
    ) -> Result<u64, DemoDataRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let tenant = *tenant_id.as_uuid();
        let deleted = diesel::delete(
            assessments::table
                .filter(assessments::tenant_id.eq(tenant))
                .filter(assessments::client_id.eq_any(demo_client_ids!(tenant))),
        )
        .execute(&mut conn)
        .await
        .map_err(|err| map_diesel_error(err, "delete assessments"))?;
        Ok(row_count(deleted))
    }

    async fn delete_engagement_events(
        &self,
        tenant_id: &TenantId,
    ) -> Result<u64, DemoDataRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let tenant = *tenant_id.as_uuid();
        let deleted = diesel::delete(
            engagement_events::table
                .filter(engagement_events::tenant_id.eq(tenant))
                .filter(engagement_events::client_id.eq_any(demo_client_ids!(tenant))),
        )
        .execute(&mut conn)
        .await
        .map_err(|err| map_diesel_error(err, "delete engagement events"))?;
        Ok(row_count(deleted))
    }

    async fn delete_clients(&self, tenant_id: &TenantId) -> Result<u64, DemoDataRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            demo_clients::table
                .filter(demo_clients::tenant_id.eq(tenant_id.as_uuid()))
                .filter(demo_clients::source.eq(DEMO_SOURCE)),
        )
        .execute(&mut conn)
        .await
        .map_err(|err| map_diesel_error(err, "delete clients"))?;
        Ok(row_count(deleted))
    }

    async fn delete_staff(&self, tenant_id: &TenantId) -> Result<u64, DemoDataRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            demo_staff::table
                .filter(demo_staff::tenant_id.eq(tenant_id.as_uuid()))
                .filter(demo_staff::source.eq(DEMO_SOURCE)),
        )
        .execute(&mut conn)
        .await
        .map_err(|err| map_diesel_error(err, "delete staff"))?;
        Ok(row_count(deleted))
    }

    async fn insert_clients(
        &self,
        records: &[SyntheticClientRecord],
    ) -> Result<(), DemoDataRepositoryError> {
        if records.is_empty() {
            return Ok(());
        }
        let rows: Vec<NewClientRow<'_>> = records.iter().map(NewClientRow::from).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let inserted = diesel::insert_into(demo_clients::table)
            .values(&rows)
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "insert clients"))?;
        debug!(inserted, "demo clients inserted");
        Ok(())
    }

    async fn insert_staff(
        &self,
        records: &[SyntheticStaffRecord],
    ) -> Result<(), DemoDataRepositoryError> {
        if records.is_empty() {
            return Ok(());
        }
        let rows: Vec<NewStaffRow<'_>> = records.iter().map(NewStaffRow::from).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let inserted = diesel::insert_into(demo_staff::table)
            .values(&rows)
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "insert staff"))?;
        debug!(inserted, "demo staff inserted");
        Ok(())
    }

    async fn insert_assessments(
        &self,
        records: &[AssessmentRecord],
    ) -> Result<(), DemoDataRepositoryError> {
        if records.is_empty() {
            return Ok(());
        }
        let rows = records
            .iter()
            .map(NewAssessmentRow::try_from_record)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| DemoDataRepositoryError::query(format!("encode responses: {err}")))?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let inserted = diesel::insert_into(assessments::table)
            .values(&rows)
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "insert assessments"))?;
        debug!(inserted, "demo assessments inserted");
        Ok(())
    }

    async fn insert_insight_documents(
        &self,
        tenant_id: &TenantId,
        documents: &[InsightDocument],
    ) -> Result<(), DemoDataRepositoryError> {
        if documents.is_empty() {
            return Ok(());
        }
        let rows: Vec<NewInsightDocumentRow<'_>> = documents
            .iter()
            .map(|document| NewInsightDocumentRow::new(tenant_id, document))
            .collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let inserted = diesel::insert_into(insight_documents::table)
            .values(&rows)
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "insert insight documents"))?;
        debug!(inserted, "insight documents inserted");
        Ok(())
    }

    async fn demo_counts(
        &self,
        tenant_id: &TenantId,
    ) -> Result<DemoDataCounts, DemoDataRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let tenant = *tenant_id.as_uuid();

        // One snapshot so the four counts agree with each other.
        let (clients, staff, assessed, documents) = conn
            .transaction(|conn| {
                async move {
                    let clients: i64 = demo_clients::table
                        .filter(demo_clients::tenant_id.eq(tenant))
                        .filter(demo_clients::source.eq(DEMO_SOURCE))
                        .count()
                        .get_result(conn)
                        .await?;
                    let staff: i64 = demo_staff::table
                        .filter(demo_staff::tenant_id.eq(tenant))
                        .filter(demo_staff::source.eq(DEMO_SOURCE))
                        .count()
                        .get_result(conn)
                        .await?;
                    let assessed: i64 = assessments::table
                        .filter(assessments::tenant_id.eq(tenant))
                        .filter(assessments::client_id.eq_any(demo_client_ids!(tenant)))
                        .count()
                        .get_result(conn)
                        .await?;
                    let documents: i64 = insight_documents::table
                        .filter(insight_documents::tenant_id.eq(tenant))
                        .filter(insight_documents::client_id.eq_any(demo_client_ids!(tenant)))
                        .count()
                        .get_result(conn)
                        .await?;
                    Ok::<_, diesel::result::Error>((clients, staff, assessed, documents))
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_diesel_error(err, "count demo data"))?;

        Ok(DemoDataCounts {
            clients: to_count(clients),
            staff: to_count(staff),
            assessments: to_count(assessed),
            insight_documents: to_count(documents),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    #[derive(Debug)]
    struct UniqueInfo;

    impl diesel::result::DatabaseErrorInformation for UniqueInfo {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            Some("demo_staff")
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            Some("demo_staff_unique_identity_key")
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    #[rstest]
    fn identity_clash_maps_to_conflict() {
        let err = map_diesel_error(
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, Box::new(UniqueInfo)),
            "insert staff",
        );

        assert!(matches!(err, DemoDataRepositoryError::Conflict { .. }));
        assert!(err.to_string().contains("demo_staff_unique_identity_key"));
    }

    #[rstest]
    fn pool_failure_maps_to_connection() {
        let err = map_pool_error(super::super::pool::PoolError::checkout("timed out"));

        assert!(matches!(err, DemoDataRepositoryError::Connection { .. }));
    }

    #[rstest]
    #[case(-3, 0)]
    #[case(0, 0)]
    #[case(25, 25)]
    fn negative_counts_clamp_to_zero(#[case] raw: i64, #[case] expected: u64) {
        assert_eq!(to_count(raw), expected);
    }
}
