//! Startup stages that run before the control socket is bound.
//!
//! Bootstrap resolves configuration, installs telemetry, then creates the
//! socket directory. Each outcome is reported through the [`HealthReporter`]
//! so a failed start is visible even when telemetry never came up.

use std::sync::Arc;

use ortho_config::OrthoError;
use thiserror::Error;

use spindle_config::{Config, SocketPreparationError};

use crate::health::HealthReporter;
use crate::state::{DaemonState, StatusBar};
use crate::telemetry::{self, TelemetryError, TelemetryHandle};

/// Where the daemon's configuration comes from.
pub trait ConfigLoader: Send + Sync {
    fn load(&self) -> Result<Config, Arc<OrthoError>>;
}

/// Reads process arguments, `SPINDLE_*` variables and the config file.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load()
    }
}

/// An already-resolved configuration loads as itself.
impl ConfigLoader for Config {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.clone())
    }
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("configuration: {source}")]
    Configuration {
        #[source]
        source: Arc<OrthoError>,
    },
    #[error("telemetry: {source}")]
    Telemetry {
        #[source]
        source: TelemetryError,
    },
    #[error("socket directory: {source}")]
    Socket {
        #[source]
        source: SocketPreparationError,
    },
}

/// A daemon that finished bootstrap and is ready to bind its socket.
pub struct Daemon {
    config: Config,
    telemetry: TelemetryHandle,
    reporter: Arc<dyn HealthReporter>,
}

impl Daemon {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn telemetry(&self) -> TelemetryHandle {
        self.telemetry
    }

    #[must_use]
    pub fn reporter(&self) -> Arc<dyn HealthReporter> {
        Arc::clone(&self.reporter)
    }

    /// State the event loop starts from: default bar settings, and
    /// `debug_output` as configured.
    #[must_use]
    pub fn initial_state(&self) -> DaemonState {
        DaemonState::new(self.config.debug_output(), StatusBar::default())
    }
}

/// Runs every bootstrap stage.
///
/// # Errors
///
/// Stops at the first failing stage and returns its error after reporting it.
pub fn bootstrap_with(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
) -> Result<Daemon, BootstrapError> {
    reporter.bootstrap_starting();
    let staged = loader
        .load()
        .map_err(|source| BootstrapError::Configuration { source })
        .and_then(|config| {
            let telemetry = telemetry::initialise(&config)
                .map_err(|source| BootstrapError::Telemetry { source })?;
            config
                .daemon_socket()
                .prepare_filesystem()
                .map_err(|source| BootstrapError::Socket { source })?;
            Ok((config, telemetry))
        });

    match staged {
        Ok((config, telemetry)) => {
            reporter.bootstrap_succeeded(&config);
            Ok(Daemon {
                config,
                telemetry,
                reporter,
            })
        }
        Err(error) => {
            reporter.bootstrap_failed(&error);
            Err(error)
        }
    }
}
