//! Control socket listener.
//!
//! Binding happens on the caller's thread so configuration mistakes surface
//! before the daemon reports readiness. [`SocketListener::start`] then moves
//! the socket onto an accept thread that polls a stop flag between
//! non-blocking accepts and spawns one reader thread per connection.

use std::io;
use std::net::{SocketAddr, TcpListener, ToSocketAddrs};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, warn};

use spindle_config::SocketEndpoint;

use super::{ConnectionHandler, ConnectionStream, LISTENER_TARGET, ListenerError};

#[cfg(unix)]
use std::os::unix::net::{UnixListener, UnixStream};
#[cfg(unix)]
use std::path::Path;

/// Pause between polls when no connection is pending.
const IDLE_POLL: Duration = Duration::from_millis(25);
/// Pause after an accept error, so a persistent fault does not spin.
const FAULT_POLL: Duration = Duration::from_millis(150);

enum Acceptor {
    Tcp(TcpListener),
    #[cfg(unix)]
    Unix(UnixListener),
}

impl Acceptor {
    fn set_nonblocking(&self) -> io::Result<()> {
        match self {
            Self::Tcp(listener) => listener.set_nonblocking(true),
            #[cfg(unix)]
            Self::Unix(listener) => listener.set_nonblocking(true),
        }
    }

    /// Accepts one pending connection, or `None` when nothing is waiting.
    fn poll(&self) -> io::Result<Option<ConnectionStream>> {
        let result = match self {
            Self::Tcp(listener) => listener.accept().and_then(|(stream, _)| {
                stream.set_nonblocking(false)?;
                Ok(ConnectionStream::Tcp(stream))
            }),
            #[cfg(unix)]
            Self::Unix(listener) => listener.accept().and_then(|(stream, _)| {
                stream.set_nonblocking(false)?;
                Ok(ConnectionStream::Unix(stream))
            }),
        };
        match result {
            Ok(stream) => Ok(Some(stream)),
            Err(error) if error.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(error) => Err(error),
        }
    }
}

impl std::fmt::Debug for Acceptor {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(match self {
            Self::Tcp(_) => "Acceptor::Tcp",
            #[cfg(unix)]
            Self::Unix(_) => "Acceptor::Unix",
        })
    }
}

/// Bound, not yet accepting, control socket.
#[derive(Debug)]
pub(crate) struct SocketListener {
    endpoint: SocketEndpoint,
    acceptor: Acceptor,
}

impl SocketListener {
    /// Binds `endpoint`, reclaiming a stale Unix socket file if one is left
    /// over from a previous run.
    pub(crate) fn bind(endpoint: &SocketEndpoint) -> Result<Self, ListenerError> {
        let acceptor = match endpoint {
            SocketEndpoint::Tcp { host, port } => Acceptor::Tcp(bind_tcp(host, *port)?),
            #[cfg(unix)]
            SocketEndpoint::Unix { path } => Acceptor::Unix(bind_unix(path.as_std_path())?),
            #[cfg(not(unix))]
            SocketEndpoint::Unix { .. } => {
                return Err(ListenerError::UnsupportedUnix {
                    endpoint: endpoint.to_string(),
                });
            }
        };
        Ok(Self {
            endpoint: endpoint.clone(),
            acceptor,
        })
    }

    /// Address a TCP listener ended up on; `None` for Unix sockets.
    pub(crate) fn local_addr(&self) -> Option<SocketAddr> {
        match &self.acceptor {
            Acceptor::Tcp(listener) => listener.local_addr().ok(),
            #[cfg(unix)]
            Acceptor::Unix(_) => None,
        }
    }

    /// Moves the socket onto the accept thread.
    pub(crate) fn start(
        self,
        handler: Arc<dyn ConnectionHandler>,
    ) -> Result<ListenerHandle, ListenerError> {
        if let Err(source) = self.acceptor.set_nonblocking() {
            self.release();
            return Err(ListenerError::NonBlocking { source });
        }

        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);
        let thread = thread::Builder::new()
            .name("spindled-listener".to_owned())
            .spawn(move || self.serve(&thread_stop, &handler))
            .map_err(|source| ListenerError::Spawn { source })?;
        Ok(ListenerHandle {
            stop,
            thread: Some(thread),
        })
    }

    fn serve(self, stop: &AtomicBool, handler: &Arc<dyn ConnectionHandler>) {
        info!(target: LISTENER_TARGET, endpoint = %self.endpoint, "accepting connections");
        let mut reported = None::<io::ErrorKind>;
        while !stop.load(Ordering::SeqCst) {
            match self.acceptor.poll() {
                Ok(Some(stream)) => {
                    reported = None;
                    let handler = Arc::clone(handler);
                    thread::spawn(move || handler.handle(stream));
                }
                Ok(None) => thread::sleep(IDLE_POLL),
                Err(error) => {
                    // Log each distinct fault once until an accept succeeds.
                    if reported.replace(error.kind()) != Some(error.kind()) {
                        warn!(target: LISTENER_TARGET, %error, "accept failed");
                    }
                    thread::sleep(FAULT_POLL);
                }
            }
        }
        self.release();
        info!(target: LISTENER_TARGET, "stopped accepting connections");
    }

    /// Removes the socket file of a Unix endpoint.
    fn release(&self) {
        #[cfg(unix)]
        if let Some(path) = self.endpoint.unix_path() {
            match std::fs::remove_file(path.as_std_path()) {
                Ok(()) => debug!(target: LISTENER_TARGET, %path, "socket file removed"),
                Err(error) if error.kind() == io::ErrorKind::NotFound => {}
                Err(error) => {
                    warn!(target: LISTENER_TARGET, %error, %path, "socket file left behind");
                }
            }
        }
    }
}

/// Stops and joins the accept thread.
#[derive(Debug)]
pub(crate) struct ListenerHandle {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl ListenerHandle {
    /// Asks the accept thread to stop after its current poll.
    pub(crate) fn shutdown(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub(crate) fn join(mut self) -> Result<(), ListenerError> {
        self.thread
            .take()
            .map_or(Ok(()), |thread| {
                thread.join().map_err(|_| ListenerError::ThreadPanic)
            })
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn bind_tcp(host: &str, port: u16) -> Result<TcpListener, ListenerError> {
    let addr = (host, port)
        .to_socket_addrs()
        .map_err(|source| ListenerError::Resolve {
            host: host.to_owned(),
            port,
            source,
        })?
        .next()
        .ok_or_else(|| ListenerError::NoAddress {
            host: host.to_owned(),
            port,
        })?;
    TcpListener::bind(addr).map_err(|source| ListenerError::BindTcp { addr, source })
}

#[cfg(unix)]
fn bind_unix(path: &Path) -> Result<UnixListener, ListenerError> {
    if path.exists() {
        reclaim_stale_socket(path)?;
    }
    UnixListener::bind(path).map_err(|source| ListenerError::BindUnix {
        path: path.display().to_string(),
        source,
    })
}

/// Deletes `path` if it is a socket nobody is listening on.
#[cfg(unix)]
fn reclaim_stale_socket(path: &Path) -> Result<(), ListenerError> {
    use std::os::unix::fs::FileTypeExt;

    let stale = |step, source| ListenerError::StaleSocket {
        path: path.display().to_string(),
        step,
        source,
    };

    let file_type = std::fs::symlink_metadata(path)
        .map_err(|source| stale("inspect", source))?
        .file_type();
    if !file_type.is_socket() {
        return Err(ListenerError::UnixNotSocket {
            path: path.display().to_string(),
        });
    }

    match UnixStream::connect(path) {
        Ok(_) => Err(ListenerError::UnixInUse {
            path: path.display().to_string(),
        }),
        Err(error)
            if matches!(
                error.kind(),
                io::ErrorKind::ConnectionRefused | io::ErrorKind::NotFound
            ) =>
        {
            debug!(target: LISTENER_TARGET, path = %path.display(), "reclaiming stale socket");
            std::fs::remove_file(path).map_err(|source| stale("remove", source))
        }
        Err(source) => Err(stale("probe", source)),
    }
}
