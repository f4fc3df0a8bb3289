//! In-memory adapters and a controllable clock for tests.
//!
//! Compiled for unit tests and, through the `test-support` feature, for the
//! integration suites under `tests/`.

mod clock;
mod demo_store;
mod insights;

pub use clock::MutableClock;
pub use demo_store::{FailurePoint, InMemoryDemoStore};
pub use insights::ScriptedInsightService;
