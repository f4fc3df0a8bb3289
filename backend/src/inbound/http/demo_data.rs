//! Demo data handlers.
//!
//! ```text
//! POST /api/v1/demo-data
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::ports::ProvisioningSummary;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Success body for `POST /api/v1/demo-data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DemoDataResponse {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub summary: ProvisioningSummary,
}

impl From<ProvisioningSummary> for DemoDataResponse {
    fn from(summary: ProvisioningSummary) -> Self {
        Self {
            success: true,
            message: format!(
                "Demo data ready: {} clients, {} staff, {} assessments, {} insights.",
                summary.clients_created,
                summary.staff_created,
                summary.assessments_created,
                summary.insights_generated
            ),
            summary,
        }
    }
}

/// Reset the signed-in tenant to a fresh demo dataset.
///
/// Previous demo records are purged first; records created by real users
/// are kept. A tenant may run this once per cooldown window.
#[utoipa::path(
    post,
    path = "/api/v1/demo-data",
    responses(
        (status = 200, description = "Demo data provisioned", body = DemoDataResponse),
        (status = 400, description = "A provisioning stage failed", body = Error),
        (status = 401, description = "No tenant in session", body = Error),
        (
            status = 429,
            description = "Cooldown window has not elapsed",
            body = Error,
            headers(("Retry-After" = u64, description = "Seconds until the next allowed run"))
        ),
        (status = 503, description = "Provisioning log unavailable", body = Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["demo-data"],
    operation_id = "provisionDemoData",
    security(("SessionCookie" = []))
)]
#[post("/demo-data")]
pub async fn provision_demo_data(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<DemoDataResponse>> {
    let tenant_id = session.require_tenant_id()?;
    info!(%tenant_id, "demo data requested");
    let summary = state.demo_provisioning.provision(&tenant_id).await?;
    Ok(web::Json(DemoDataResponse::from(summary)))
}
