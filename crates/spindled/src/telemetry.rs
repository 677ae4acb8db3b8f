//! Global `tracing` subscriber for the daemon.
//!
//! The subscriber is a registry with an [`EnvFilter`] and one formatting layer
//! chosen by [`LogFormat`]. Thread names are recorded because dispatch runs on
//! `spindled-events` while connections are read on listener threads.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use spindle_config::{Config, LogFormat};

static INSTALLED: OnceCell<()> = OnceCell::new();

/// Marker returned once the subscriber is in place.
#[derive(Debug, Default, Clone, Copy)]
pub struct TelemetryHandle;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log filter '{filter}': {reason}")]
    Filter { filter: String, reason: String },
    #[error("failed to install telemetry subscriber: {0}")]
    Install(#[from] TryInitError),
}

/// Installs the subscriber described by `config`.
///
/// Only the first successful call installs anything; later calls keep the
/// original filter and format.
pub fn initialise(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    INSTALLED
        .get_or_try_init(|| {
            let filter = parse_filter(config.log_filter())?;
            Registry::default()
                .with(format_layer(config.log_format()).with_filter(filter))
                .try_init()
                .map_err(TelemetryError::from)
        })
        .map(|()| TelemetryHandle)
}

fn parse_filter(filter: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(filter).map_err(|error| TelemetryError::Filter {
        filter: filter.to_owned(),
        reason: error.to_string(),
    })
}

fn format_layer(format: LogFormat) -> Box<dyn Layer<Registry> + Send + Sync> {
    let layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_timer(UtcTime::rfc_3339())
        .with_thread_names(true);
    match format {
        LogFormat::Json => layer.json().flatten_event(true).boxed(),
        LogFormat::Compact => layer.compact().boxed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_levels_are_rejected() {
        let error = parse_filter("spindled=verbose").expect_err("filter should not parse");
        assert!(matches!(
            error,
            TelemetryError::Filter { ref filter, .. } if filter == "spindled=verbose"
        ));
    }

    #[test]
    fn target_directives_parse() {
        assert!(parse_filter("info,spindled::dispatch=debug").is_ok());
    }
}
