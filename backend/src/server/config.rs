//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};
use demo_provisioner::domain::ports::{DemoProvisioningCommand, FixtureDemoProvisioningCommand};

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) demo_provisioning: Arc<dyn DemoProvisioningCommand>,
}

impl ServerConfig {
    /// Construct a server configuration backed by fixture ports.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            demo_provisioning: Arc::new(FixtureDemoProvisioningCommand),
        }
    }

    /// Replace the fixture with a real provisioning service.
    #[must_use]
    pub fn with_demo_provisioning(mut self, command: Arc<dyn DemoProvisioningCommand>) -> Self {
        self.demo_provisioning = command;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
