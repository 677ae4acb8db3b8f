//! Blocking wait for the signal that ends the serving phase.

use std::io;

use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
use signal_hook::iterator::Signals;
use thiserror::Error;
use tracing::info;

use super::PROCESS_TARGET;

/// Signals that stop the daemon. `SIGHUP` stops it too; there is no reload.
const TERMINATING_SIGNALS: [(i32, &str); 4] = [
    (SIGTERM, "SIGTERM"),
    (SIGINT, "SIGINT"),
    (SIGQUIT, "SIGQUIT"),
    (SIGHUP, "SIGHUP"),
];

/// Source of the "stop serving" notification.
pub trait ShutdownSignal: Send + Sync {
    /// Returns once the daemon should begin shutting down.
    fn wait(&self) -> Result<(), ShutdownError>;
}

#[derive(Debug, Error)]
pub enum ShutdownError {
    #[error("failed to register termination signals: {source}")]
    Register {
        #[source]
        source: io::Error,
    },
}

/// Waits on the process's termination signals.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemShutdownSignal;

impl ShutdownSignal for SystemShutdownSignal {
    fn wait(&self) -> Result<(), ShutdownError> {
        let mut signals = Signals::new(TERMINATING_SIGNALS.map(|(number, _)| number))
            .map_err(|source| ShutdownError::Register { source })?;
        let received = signals.forever().next();
        info!(
            target: PROCESS_TARGET,
            signal = received.map_or("none", signal_name),
            "stopping on signal"
        );
        Ok(())
    }
}

fn signal_name(number: i32) -> &'static str {
    TERMINATING_SIGNALS
        .iter()
        .find_map(|(candidate, name)| (*candidate == number).then_some(*name))
        .unwrap_or("unknown")
}
