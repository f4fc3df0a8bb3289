//! OpenAPI document for the provisioner's HTTP surface.
//!
//! Served by Swagger UI in debug builds and printed by the `openapi-dump`
//! binary for client generation.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ports::ProvisioningSummary;
use crate::domain::{Error, ErrorCode};
use crate::inbound::http::demo_data::DemoDataResponse;

/// Registers the session cookie security scheme.
struct SessionCookieAddon;

impl Modify for SessionCookieAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie carrying the signed-in tenant.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SessionCookieAddon),
    info(
        title = "Demo provisioner API",
        description = "Resets a tenant to a fresh demo dataset and reports readiness."
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    paths(
        crate::inbound::http::demo_data::provision_demo_data,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(DemoDataResponse, ProvisioningSummary, Error, ErrorCode)),
    tags(
        (name = "demo-data", description = "Tenant demo dataset provisioning"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
