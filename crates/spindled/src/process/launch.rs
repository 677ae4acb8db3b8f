//! Sequences daemon startup, the serving phase, and orderly shutdown.

use std::sync::Arc;

use tracing::info;

use crate::StructuredHealthReporter;
use crate::bootstrap::{ConfigLoader, SystemConfigLoader, bootstrap_with};
use crate::events::EventLoop;
use crate::health::HealthReporter;
use crate::transport::{MessageHandoff, SocketListener};

use super::PROCESS_TARGET;
use super::errors::LaunchError;
use super::shutdown::{ShutdownSignal, SystemShutdownSignal};

/// Collaborators required to launch the daemon runtime.
pub(crate) struct LaunchPlan<L, S> {
    pub(crate) loader: L,
    pub(crate) reporter: Arc<dyn HealthReporter>,
    pub(crate) shutdown: S,
}

/// Runs the daemon in the foreground until a termination signal arrives.
///
/// # Errors
///
/// Returns the first launch stage that failed.
pub fn run_daemon() -> Result<(), LaunchError> {
    run_daemon_with(LaunchPlan {
        loader: SystemConfigLoader,
        reporter: Arc::new(StructuredHealthReporter::new()),
        shutdown: SystemShutdownSignal,
    })
}

/// Runs the daemon with injected collaborators.
pub(crate) fn run_daemon_with<L, S>(plan: LaunchPlan<L, S>) -> Result<(), LaunchError>
where
    L: ConfigLoader,
    S: ShutdownSignal,
{
    let LaunchPlan {
        loader,
        reporter,
        shutdown,
    } = plan;

    let daemon = bootstrap_with(&loader, reporter)?;
    let reporter = daemon.reporter();
    let endpoint = daemon.config().daemon_socket().clone();
    let listener = SocketListener::bind(&endpoint)?;
    info!(
        target: PROCESS_TARGET,
        endpoint = %endpoint,
        local_addr = ?listener.local_addr(),
        "control socket bound"
    );

    let events = EventLoop::new(daemon.initial_state()).spawn()?;
    let handoff = Arc::new(MessageHandoff::new(events.queue()));
    let listener_handle = match listener.start(handoff) {
        Ok(handle) => handle,
        Err(error) => {
            // Drain the loop so its thread does not outlive the failed launch.
            let _ = events.shutdown();
            return Err(error.into());
        }
    };
    reporter.listener_ready(&endpoint);

    let waited = shutdown.wait();
    reporter.shutdown_starting();
    listener_handle.shutdown();
    let joined = listener_handle.join();
    events.shutdown()?;
    reporter.shutdown_completed();
    waited?;
    joined?;

    info!(target: PROCESS_TARGET, "shutdown sequence completed");
    Ok(())
}
