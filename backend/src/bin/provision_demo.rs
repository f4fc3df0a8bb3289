//! Operator CLI: reset a tenant's demo dataset or inspect its cooldown.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::io;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use demo_provisioner::domain::{CooldownDecision, TenantId};
use demo_provisioner::outbound::persistence::{DbPool, PoolConfig};
use demo_provisioner::provisioning::{ProvisionerSettings, build_provisioning_service};
use serde::Serialize;
use tokio::runtime::Builder;
use tracing_subscriber::{EnvFilter, fmt};

/// `provision-demo` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "provision-demo",
    about = "Reset a tenant to a fresh demo dataset or report its cooldown",
    version
)]
struct CliArgs {
    /// Database connection URL. Falls back to `DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url", global = true)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Run the provisioner for a tenant.
    Run {
        /// Tenant to provision.
        #[arg(long, value_name = "uuid", value_parser = parse_tenant)]
        tenant: TenantId,
    },
    /// Report whether the tenant may run the provisioner now.
    Status {
        /// Tenant to inspect.
        #[arg(long, value_name = "uuid", value_parser = parse_tenant)]
        tenant: TenantId,
    },
}

/// Cooldown state printed by `status`.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
struct StatusReport {
    tenant_id: TenantId,
    eligible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    retry_after_hours: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_run_at: Option<DateTime<Utc>>,
}

impl StatusReport {
    fn from_decision(tenant_id: TenantId, decision: CooldownDecision) -> Self {
        match decision {
            CooldownDecision::Allowed => Self {
                tenant_id,
                eligible: true,
                retry_after_hours: None,
                last_run_at: None,
            },
            CooldownDecision::RateLimited {
                retry_after_hours,
                last_run_at,
            } => Self {
                tenant_id,
                eligible: false,
                retry_after_hours: Some(retry_after_hours),
                last_run_at: Some(last_run_at),
            },
        }
    }
}

fn main() -> io::Result<()> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    // Logs go to stderr so stdout stays machine-readable.
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init();

    let database_url = resolve_database_url(args.database_url)?;
    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;
    let settings = ProvisionerSettings::from_environment()
        .map_err(|error| io::Error::other(format!("load provisioner settings: {error}")))?;
    let service = build_provisioning_service(&settings, pool)
        .map_err(|error| io::Error::other(format!("wire demo provisioning: {error}")))?;

    let output = match args.command {
        Command::Run { tenant } => {
            let summary = service
                .provision_demo(&tenant)
                .await
                .map_err(|error| io::Error::other(format!("provisioning failed: {error}")))?;
            serde_json::to_string_pretty(&summary)
        }
        Command::Status { tenant } => {
            let decision = service
                .cooldown_status(&tenant)
                .await
                .map_err(|error| io::Error::other(format!("status check failed: {error}")))?;
            serde_json::to_string_pretty(&StatusReport::from_decision(tenant, decision))
        }
    }
    .map_err(io::Error::other)?;

    println!("{output}");
    Ok(())
}

fn parse_tenant(raw: &str) -> Result<TenantId, String> {
    TenantId::new(raw).map_err(|error| format!("invalid tenant id: {error}"))
}

fn resolve_database_url(explicit: Option<String>) -> io::Result<String> {
    let value = match explicit {
        Some(value) => value,
        None => env::var("DATABASE_URL").map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "database URL missing: set --database-url or DATABASE_URL",
            )
        })?,
    };
    if value.trim().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "database URL must not be empty",
        ));
    }
    Ok(value)
}
