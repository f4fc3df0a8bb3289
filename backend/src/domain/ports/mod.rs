//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod demo_data_repository;
mod demo_provisioning_command;
mod insight_service;
mod provisioning_log_repository;

#[cfg(test)]
pub use demo_data_repository::MockDemoDataRepository;
pub use demo_data_repository::{
    DemoDataRepository, DemoDataRepositoryError, FixtureDemoDataRepository,
};
#[cfg(test)]
pub use demo_provisioning_command::MockDemoProvisioningCommand;
pub use demo_provisioning_command::{
    DemoProvisioningCommand, FixtureDemoProvisioningCommand, ProvisioningSummary,
};
#[cfg(test)]
pub use insight_service::MockInsightService;
pub use insight_service::{
    FixtureInsightService, InsightRequest, InsightService, InsightServiceError,
};
#[cfg(test)]
pub use provisioning_log_repository::MockProvisioningLogRepository;
pub use provisioning_log_repository::{
    ClaimResult, FixtureProvisioningLogRepository, ProvisioningCounts, ProvisioningLogEntry,
    ProvisioningLogRepository, ProvisioningLogRepositoryError, ProvisioningOutcome,
};
