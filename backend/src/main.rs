//! Backend entry-point: wires the demo-data endpoint, health probes and
//! OpenAPI docs.

mod server;

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use demo_provisioner::inbound::http::health::HealthState;
use demo_provisioner::inbound::http::session_config::{BuildMode, session_settings_from_env};
use demo_provisioner::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations_async};
use demo_provisioner::provisioning::{ProvisionerSettings, build_provisioning_service};
use server::{ServerConfig, create_server};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::current())
        .wrap_err("invalid session configuration")?;
    let bind_addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_owned())
        .parse()
        .wrap_err("BIND_ADDR must be a socket address")?;

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
    );

    match env::var("DATABASE_URL") {
        Ok(database_url) => {
            let applied = run_pending_migrations_async(database_url.clone())
                .await
                .wrap_err("failed to apply migrations")?;
            info!(applied, "database migrations applied");

            let pool = DbPool::new(PoolConfig::new(database_url))
                .await
                .wrap_err("failed to build database pool")?;
            let settings = ProvisionerSettings::from_environment()
                .map_err(|err| eyre!("failed to load provisioner settings: {err}"))?;
            let service = build_provisioning_service(&settings, pool)
                .wrap_err("failed to wire demo provisioning")?;
            config = config.with_demo_provisioning(Arc::new(service));
        }
        Err(_) => {
            warn!("DATABASE_URL is not set; serving fixture demo provisioning");
        }
    }

    let health_state = web::Data::new(HealthState::new());
    info!(bind_addr = %config.bind_addr(), "starting demo provisioner");
    let server = create_server(health_state, config)?;
    server.await?;
    Ok(())
}
