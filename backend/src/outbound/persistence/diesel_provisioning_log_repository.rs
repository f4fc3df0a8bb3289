//! PostgreSQL-backed provisioning log.
//!
//! Cooldown claims take a transaction-scoped advisory lock keyed on the
//! tenant, so concurrent claims for one tenant serialise and exactly one of
//! them observes an empty window.

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::Text;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::TenantId;
use crate::domain::ports::{
    ClaimResult, ProvisioningCounts, ProvisioningLogEntry, ProvisioningLogRepository,
    ProvisioningLogRepositoryError, ProvisioningOutcome,
};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, pool_error_message};
use super::models::{NewProvisioningLogRow, ProvisioningLogRow};
use super::pool::DbPool;
use super::schema::provisioning_log;

const ADVISORY_LOCK_SQL: &str = "SELECT pg_advisory_xact_lock(hashtext($1))";

/// Diesel implementation of [`ProvisioningLogRepository`].
#[derive(Clone)]
pub struct DieselProvisioningLogRepository {
    pool: DbPool,
}

impl DieselProvisioningLogRepository {
    /// Repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_diesel_error(
    error: diesel::result::Error,
    operation: &str,
) -> ProvisioningLogRepositoryError {
    match classify_diesel_error(error, operation) {
        DieselFailure::Connection(message) => ProvisioningLogRepositoryError::connection(message),
        DieselFailure::UniqueViolation(message) | DieselFailure::Query(message) => {
            ProvisioningLogRepositoryError::query(message)
        }
    }
}

fn to_db_count(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn from_db_count(value: i32) -> Result<u32, ProvisioningLogRepositoryError> {
    u32::try_from(value)
        .map_err(|_| ProvisioningLogRepositoryError::query(format!("negative count {value}")))
}

fn new_row(entry: &ProvisioningLogEntry) -> NewProvisioningLogRow<'_> {
    let counts = entry.counts;
    NewProvisioningLogRow {
        tenant_id: *entry.tenant_id.as_uuid(),
        recorded_at: entry.recorded_at,
        outcome: entry.outcome.as_str(),
        clients_created: counts.map(|c| to_db_count(c.clients)),
        staff_created: counts.map(|c| to_db_count(c.staff)),
        assessments_created: counts.map(|c| to_db_count(c.assessments)),
        insights_generated: counts.map(|c| to_db_count(c.insights)),
        error_message: entry.error_message.as_deref(),
    }
}

fn row_to_entry(
    row: ProvisioningLogRow,
) -> Result<ProvisioningLogEntry, ProvisioningLogRepositoryError> {
    let outcome = ProvisioningOutcome::parse(&row.outcome).ok_or_else(|| {
        ProvisioningLogRepositoryError::query(format!("unknown outcome '{}'", row.outcome))
    })?;
    let counts = match (
        row.clients_created,
        row.staff_created,
        row.assessments_created,
        row.insights_generated,
    ) {
        (Some(clients), Some(staff), Some(assessments), Some(insights)) => {
            Some(ProvisioningCounts {
                clients: from_db_count(clients)?,
                staff: from_db_count(staff)?,
                assessments: from_db_count(assessments)?,
                insights: from_db_count(insights)?,
            })
        }
        _ => None,
    };
    Ok(ProvisioningLogEntry {
        tenant_id: TenantId::from_uuid(row.tenant_id),
        recorded_at: row.recorded_at,
        outcome,
        counts,
        error_message: row.error_message,
    })
}

async fn latest_recorded_at(
    conn: &mut AsyncPgConnection,
    tenant_id: &TenantId,
) -> Result<Option<DateTime<Utc>>, diesel::result::Error> {
    provisioning_log::table
        .filter(provisioning_log::tenant_id.eq(tenant_id.as_uuid()))
        .select(provisioning_log::recorded_at)
        .order(provisioning_log::recorded_at.desc())
        .first(conn)
        .await
        .optional()
}

#[async_trait]
impl ProvisioningLogRepository for DieselProvisioningLogRepository {
    async fn latest_entry(
        &self,
        tenant_id: &TenantId,
    ) -> Result<Option<ProvisioningLogEntry>, ProvisioningLogRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| ProvisioningLogRepositoryError::connection(pool_error_message(err)))?;

        let row: Option<ProvisioningLogRow> = provisioning_log::table
            .filter(provisioning_log::tenant_id.eq(tenant_id.as_uuid()))
            .order((provisioning_log::recorded_at.desc(), provisioning_log::id.desc()))
            .select(ProvisioningLogRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "read latest log entry"))?;

        row.map(row_to_entry).transpose()
    }

    async fn try_claim_run(
        &self,
        tenant_id: &TenantId,
        now: DateTime<Utc>,
        window: TimeDelta,
    ) -> Result<ClaimResult, ProvisioningLogRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| ProvisioningLogRepositoryError::connection(pool_error_message(err)))?;
        let tenant = *tenant_id;
        let lock_key = tenant_id.to_string();

        let result = conn
            .transaction(|conn| {
                async move {
                    sql_query(ADVISORY_LOCK_SQL)
                        .bind::<Text, _>(lock_key)
                        .execute(conn)
                        .await?;

                    if let Some(last_run_at) = latest_recorded_at(conn, &tenant).await? {
                        if now - last_run_at < window {
                            return Ok(ClaimResult::CoolingDown { last_run_at });
                        }
                    }

                    let started = ProvisioningLogEntry::started(tenant, now);
                    diesel::insert_into(provisioning_log::table)
                        .values(&new_row(&started))
                        .execute(conn)
                        .await?;
                    Ok(ClaimResult::Claimed)
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_diesel_error(err, "claim provisioning run"))?;

        debug!(tenant_id = %tenant, ?result, "cooldown claim evaluated");
        Ok(result)
    }

    async fn append(
        &self,
        entry: &ProvisioningLogEntry,
    ) -> Result<(), ProvisioningLogRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| ProvisioningLogRepositoryError::connection(pool_error_message(err)))?;

        diesel::insert_into(provisioning_log::table)
            .values(&new_row(entry))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, "append log entry"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use uuid::Uuid;

    fn row(outcome: &str, counts: Option<i32>) -> ProvisioningLogRow {
        ProvisioningLogRow {
            tenant_id: Uuid::nil(),
            recorded_at: Utc
                .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
                .single()
                .expect("valid timestamp"),
            outcome: outcome.to_owned(),
            clients_created: counts,
            staff_created: counts,
            assessments_created: counts,
            insights_generated: counts,
            error_message: None,
        }
    }

    #[rstest]
    fn succeeded_row_restores_counts() {
        let entry = row_to_entry(row("succeeded", Some(25))).expect("valid row");

        assert_eq!(entry.outcome, ProvisioningOutcome::Succeeded);
        assert_eq!(entry.counts.map(|c| c.insights), Some(25));
    }

    #[rstest]
    fn started_row_has_no_counts() {
        let entry = row_to_entry(row("started", None)).expect("valid row");

        assert_eq!(entry.counts, None);
    }

    #[rstest]
    #[case(row("paused", None))]
    #[case(row("succeeded", Some(-1)))]
    fn corrupt_rows_are_query_errors(#[case] input: ProvisioningLogRow) {
        let err = row_to_entry(input).expect_err("corrupt row");

        assert!(matches!(err, ProvisioningLogRepositoryError::Query { .. }));
    }

    #[rstest]
    fn failed_entry_keeps_message_and_omits_counts() {
        let entry = ProvisioningLogEntry::failed(TenantId::random(), Utc::now(), "cleanup failed");

        let row = new_row(&entry);

        assert_eq!(row.outcome, "failed");
        assert_eq!(row.error_message, Some("cleanup failed"));
        assert_eq!(row.clients_created, None);
    }
}
