//! Shared fixtures for the daemon behavioural suites.

mod client;
mod config_loader;
mod reporter;

pub use client::{DaemonClient, field_list};
pub use config_loader::{FailingConfigLoader, TestConfigLoader};
pub use reporter::{HealthEvent, RecordingHealthReporter};
