//! Shared configuration for the Spindle daemon and its command-line client.
//!
//! Values are layered by [`ortho_config`]: built-in defaults, then an optional
//! TOML file named by `--config-path` (or `SPINDLE_CONFIG_PATH`), then
//! `SPINDLE_*` environment variables, then command-line flags. Both binaries
//! load the same [`Config`] so the client always connects to the socket the
//! daemon bound.

use std::ffi::OsString;
use std::sync::Arc;

use ortho_config::{OrthoConfig, OrthoError};
use serde::{Deserialize, Serialize};

mod defaults;
mod logging;
mod socket;

pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_TCP_PORT, SOCKET_FILE_NAME, default_log_filter,
    default_log_filter_string, default_log_format, default_socket_endpoint,
};
pub use logging::{LogFormat, LogFormatParseError};
pub use socket::{SocketEndpoint, SocketParseError, SocketPreparationError};

/// Resolved configuration shared by `spindled` and `spindle`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "SPINDLE")]
#[serde(default)]
pub struct Config {
    /// Control socket the daemon binds and the client connects to.
    pub daemon_socket: SocketEndpoint,
    /// `tracing` filter expression applied to daemon telemetry.
    pub log_filter: String,
    /// Output format for daemon telemetry.
    pub log_format: LogFormat,
    /// Initial state of the daemon's `debug_output` flag.
    pub debug_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            daemon_socket: default_socket_endpoint(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            debug_output: false,
        }
    }
}

impl Config {
    /// Loads configuration from the process arguments and environment.
    ///
    /// # Errors
    ///
    /// Returns the loader error when a configuration source cannot be read or
    /// merged.
    pub fn load() -> Result<Self, Arc<OrthoError>> {
        Self::load_from_iter(std::env::args_os())
    }

    /// Loads configuration from an explicit argument list.
    ///
    /// The first item is treated as the binary name, as with `std::env::args`.
    ///
    /// # Errors
    ///
    /// Returns the loader error when a configuration source cannot be read or
    /// merged.
    pub fn load_from_iter<I, T>(args: I) -> Result<Self, Arc<OrthoError>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as OrthoConfig>::load_from_iter(args)
    }

    /// Control socket endpoint.
    #[must_use]
    pub fn daemon_socket(&self) -> &SocketEndpoint {
        &self.daemon_socket
    }

    /// Telemetry filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Telemetry output format.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Initial verbosity flag for the daemon.
    #[must_use]
    pub fn debug_output(&self) -> bool {
        self.debug_output
    }
}
