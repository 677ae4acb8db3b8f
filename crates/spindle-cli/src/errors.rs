//! Client failures and how they are reported.

use std::io;
use std::sync::Arc;

use spindle_protocol::EncodeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    Configuration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    Usage(clap::Error),
    #[error("cannot encode message: {0}")]
    Encode(#[from] EncodeError),
    /// Covers name resolution as well as the connect call itself.
    #[error("cannot reach spindled at {endpoint}: {source}")]
    Connect { endpoint: String, source: io::Error },
    #[cfg(not(unix))]
    #[error("{0} needs Unix socket support")]
    UnixUnsupported(String),
    #[error("{stage} failed: {source}")]
    Exchange {
        stage: ExchangeStage,
        source: io::Error,
    },
}

/// Step of the request/response exchange that hit an IO error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExchangeStage {
    Send,
    Receive,
    Relay,
}

impl std::fmt::Display for ExchangeStage {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(match self {
            Self::Send => "sending the message",
            Self::Receive => "reading the response",
            Self::Relay => "printing the response",
        })
    }
}

impl AppError {
    pub(crate) fn exchange(stage: ExchangeStage) -> impl FnOnce(io::Error) -> Self {
        move |source| Self::Exchange { stage, source }
    }

    /// Whether nothing was listening on the configured socket.
    pub(crate) fn is_daemon_down(&self) -> bool {
        matches!(
            self,
            Self::Connect { source, .. } if matches!(
                source.kind(),
                io::ErrorKind::ConnectionRefused
                    | io::ErrorKind::NotFound
                    | io::ErrorKind::AddrNotAvailable
            )
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refused_connections_mean_the_daemon_is_down() {
        let error = AppError::Connect {
            endpoint: "tcp://127.0.0.1:1".to_owned(),
            source: io::Error::from(io::ErrorKind::ConnectionRefused),
        };
        assert!(error.is_daemon_down());
    }

    #[test]
    fn exchange_failures_name_their_stage() {
        let error = AppError::exchange(ExchangeStage::Receive)(io::Error::from(
            io::ErrorKind::TimedOut,
        ));
        assert!(!error.is_daemon_down());
        assert!(error.to_string().starts_with("reading the response failed"));
    }
}
