//! Listener failures.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("cannot resolve {host}:{port}: {source}")]
    Resolve {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },
    #[error("{host}:{port} resolved to no addresses")]
    NoAddress { host: String, port: u16 },
    #[error("cannot bind {addr}: {source}")]
    BindTcp {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[cfg(unix)]
    #[error("cannot bind {path}: {source}")]
    BindUnix {
        path: String,
        #[source]
        source: io::Error,
    },
    #[cfg(unix)]
    #[error("socket {path} is held by a running daemon")]
    UnixInUse { path: String },
    #[cfg(unix)]
    #[error("refusing to replace {path}: not a socket")]
    UnixNotSocket { path: String },
    /// Inspecting, probing, or removing a leftover socket file failed.
    #[cfg(unix)]
    #[error("cannot {step} stale socket {path}: {source}")]
    StaleSocket {
        path: String,
        step: &'static str,
        #[source]
        source: io::Error,
    },
    #[cfg(not(unix))]
    #[error("{endpoint} needs Unix socket support")]
    UnsupportedUnix { endpoint: String },
    #[error("cannot switch the listener to non-blocking mode: {source}")]
    NonBlocking {
        #[source]
        source: io::Error,
    },
    #[error("cannot start the accept thread: {source}")]
    Spawn {
        #[source]
        source: io::Error,
    },
    #[error("accept thread panicked")]
    ThreadPanic,
}
