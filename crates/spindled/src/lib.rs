//! The Spindle status-bar daemon.
//!
//! `spindled` owns the status bar settings and exposes them over a local
//! control socket. Clients send NUL-delimited messages naming a domain, a
//! command, and its arguments; the daemon answers queries with the current
//! value and reports failures with a leading
//! [`spindle_protocol::FAILURE_MARKER`].
//!
//! Startup loads [`spindle_config::Config`], installs structured telemetry,
//! and prepares the socket directory. The listener then hands every message
//! to a single event loop thread, which is the only code that touches
//! [`state::DaemonState`]. A termination signal stops the listener and drains
//! the loop before the process exits.

mod bootstrap;
pub mod events;
mod health;
pub mod message;
mod process;
pub mod state;
mod telemetry;
mod transport;

pub use bootstrap::{
    BootstrapError, ConfigLoader, Daemon, SystemConfigLoader, bootstrap_with,
};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use process::{LaunchError, ShutdownError, ShutdownSignal, SystemShutdownSignal, run_daemon};
pub use telemetry::{TelemetryError, TelemetryHandle};
pub use transport::ListenerError;

#[cfg(test)]
mod tests;
