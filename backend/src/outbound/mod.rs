//! Outbound adapters implementing the provisioning ports.
//!
//! - **persistence**: PostgreSQL repositories over Diesel
//! - **insights**: HTTP client for the external enrichment service
//!
//! Adapters translate between domain records and infrastructure types; they
//! hold no provisioning logic.

pub mod insights;
pub mod persistence;
