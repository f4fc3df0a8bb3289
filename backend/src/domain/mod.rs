//! Domain primitives, services and ports for demo provisioning.
//!
//! Purpose: keep the provisioning rules (cooldown, cascading cleanup,
//! composition, enrichment fan-out and audit logging) independent of HTTP
//! and storage. Adapters talk to the domain only through [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`) — transport-agnostic failure payload.
//! - DemoProvisioningService — orchestrator implementing
//!   [`ports::DemoProvisioningCommand`].
//! - TenantId, TraceId — identifiers threaded through every call.

pub mod cooldown;
pub mod demo_cleanup;
pub mod demo_composer;
pub mod demo_provisioning;
pub mod demo_records;
pub mod error;
pub mod insight_fanout;
pub mod ports;
pub mod provisioning_log;
pub mod tenant;
pub mod trace_id;

pub use self::cooldown::{CooldownDecision, CooldownGuard, DEFAULT_COOLDOWN_HOURS};
pub use self::demo_cleanup::{CleanupFailure, CleanupReport, CleanupStage, DemoCleanup};
pub use self::demo_composer::{
    CommittedCounts, ComposedDataset, CompositionFailure, CompositionStage, DemoComposer,
};
pub use self::demo_provisioning::{
    DemoProvisioningConfig, DemoProvisioningPorts, DemoProvisioningService, ProvisioningError,
};
pub use self::demo_records::{
    AssessmentRecord, DEMO_SOURCE, DemoDataCounts, InsightDocument, InsightStatus,
    SyntheticClientRecord, SyntheticStaffRecord,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::insight_fanout::{
    FanoutConfig, FanoutOutcome, FanoutTally, InsightFanout, MAX_FANOUT_CONCURRENCY,
};
pub use self::provisioning_log::ProvisioningLogger;
pub use self::tenant::{TenantId, TenantIdValidationError};
pub use self::trace_id::TraceId;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use demo_provisioner::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::unauthorized("login required"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
