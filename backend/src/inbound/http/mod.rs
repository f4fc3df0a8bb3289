//! HTTP inbound adapter exposing the demo provisioning endpoint.

pub mod demo_data;
pub mod error;
pub mod health;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
