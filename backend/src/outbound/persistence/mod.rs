//! PostgreSQL adapters for the provisioning ports.
//!
//! Row structs and table definitions stay private; repositories translate
//! between them and domain records. Connections come from a shared
//! `diesel-async` `bb8` pool.

mod diesel_demo_data_repository;
mod diesel_error_mapping;
mod diesel_provisioning_log_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_demo_data_repository::DieselDemoDataRepository;
pub use diesel_provisioning_log_repository::DieselProvisioningLogRepository;
pub use migrations::{
    MIGRATIONS, MigrationError, run_pending_migrations, run_pending_migrations_async,
};
pub use pool::{DbPool, PoolConfig, PoolError};
