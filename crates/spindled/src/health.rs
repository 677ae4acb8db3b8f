//! Lifecycle reporting.
//!
//! Bootstrap, readiness and shutdown milestones go through [`HealthReporter`]
//! so tests can record them. The default reporter turns each milestone into
//! one `tracing` event carrying a stable `event` field.

use spindle_config::{Config, SocketEndpoint};
use tracing::{error, info};

use crate::bootstrap::BootstrapError;

const HEALTH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::health");

/// Observer for daemon lifecycle milestones.
pub trait HealthReporter: Send + Sync {
    fn bootstrap_starting(&self);
    fn bootstrap_succeeded(&self, config: &Config);
    fn bootstrap_failed(&self, error: &BootstrapError);
    /// The control socket is bound and accepting.
    fn listener_ready(&self, endpoint: &SocketEndpoint);
    /// A stop was requested; queued messages are still being drained.
    fn shutdown_starting(&self);
    /// The listener and the event loop have both stopped.
    fn shutdown_completed(&self);
}

/// Reporter that logs milestones under the `spindled::health` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredHealthReporter;

impl StructuredHealthReporter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn milestone(event: &'static str, message: &'static str) {
        info!(target: HEALTH_TARGET, event, "{message}");
    }
}

impl HealthReporter for StructuredHealthReporter {
    fn bootstrap_starting(&self) {
        Self::milestone("bootstrap_starting", "loading configuration");
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        info!(
            target: HEALTH_TARGET,
            event = "bootstrap_succeeded",
            socket = %config.daemon_socket(),
            log_filter = config.log_filter(),
            log_format = %config.log_format(),
            debug_output = config.debug_output(),
            "configuration loaded"
        );
    }

    fn bootstrap_failed(&self, failure: &BootstrapError) {
        error!(
            target: HEALTH_TARGET,
            event = "bootstrap_failed",
            error = %failure,
            "bootstrap aborted"
        );
    }

    fn listener_ready(&self, endpoint: &SocketEndpoint) {
        info!(
            target: HEALTH_TARGET,
            event = "listener_ready",
            %endpoint,
            "ready for control messages"
        );
    }

    fn shutdown_starting(&self) {
        Self::milestone("shutdown_starting", "draining pending messages");
    }

    fn shutdown_completed(&self) {
        Self::milestone("shutdown_completed", "daemon stopped");
    }
}
