//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` and depend only on
//! driving ports, so they stay testable without a database.

use std::sync::Arc;

use crate::domain::ports::{DemoProvisioningCommand, FixtureDemoProvisioningCommand};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub demo_provisioning: Arc<dyn DemoProvisioningCommand>,
}

impl HttpState {
    /// Construct state from the provisioning port.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use demo_provisioner::domain::ports::FixtureDemoProvisioningCommand;
    /// use demo_provisioner::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::new(Arc::new(FixtureDemoProvisioningCommand));
    /// let _command = state.demo_provisioning.clone();
    /// ```
    pub fn new(demo_provisioning: Arc<dyn DemoProvisioningCommand>) -> Self {
        Self { demo_provisioning }
    }
}

impl Default for HttpState {
    fn default() -> Self {
        Self::new(Arc::new(FixtureDemoProvisioningCommand))
    }
}
