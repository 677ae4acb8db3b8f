//! One request/response exchange with `spindled`.
//!
//! The client writes a single encoded message and then reads until the
//! daemon closes the connection. Mutations close without writing anything.

use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use spindle_config::SocketEndpoint;

#[cfg(unix)]
use std::os::unix::net::UnixStream;

#[cfg(unix)]
use socket2::{Domain, SockAddr, Socket, Type};

use crate::errors::{AppError, ExchangeStage};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Bounds the wait for a daemon that accepted but never answers.
const RESPONSE_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) enum Connection {
    Tcp(TcpStream),
    #[cfg(unix)]
    Unix(UnixStream),
}

impl Connection {
    fn stream(&mut self) -> &mut dyn ReadWrite {
        match self {
            Self::Tcp(stream) => stream,
            #[cfg(unix)]
            Self::Unix(stream) => stream,
        }
    }

    fn bound_reads(&self) -> io::Result<()> {
        match self {
            Self::Tcp(stream) => stream.set_read_timeout(Some(RESPONSE_TIMEOUT)),
            #[cfg(unix)]
            Self::Unix(stream) => stream.set_read_timeout(Some(RESPONSE_TIMEOUT)),
        }
    }

    /// Sends `message` and returns everything the daemon wrote back.
    pub(crate) fn exchange(mut self, message: &[u8]) -> Result<Vec<u8>, AppError> {
        let stream = self.stream();
        stream
            .write_all(message)
            .and_then(|()| stream.flush())
            .map_err(AppError::exchange(ExchangeStage::Send))?;

        self.bound_reads()
            .map_err(AppError::exchange(ExchangeStage::Receive))?;
        let mut response = Vec::new();
        self.stream()
            .read_to_end(&mut response)
            .map_err(AppError::exchange(ExchangeStage::Receive))?;
        Ok(response)
    }
}

trait ReadWrite: Read + Write {}

impl<T: Read + Write> ReadWrite for T {}

pub(crate) fn connect(endpoint: &SocketEndpoint) -> Result<Connection, AppError> {
    let connect_failed = |source| AppError::Connect {
        endpoint: endpoint.to_string(),
        source,
    };
    match endpoint {
        SocketEndpoint::Tcp { host, port } => {
            let address = first_address(host, *port).map_err(connect_failed)?;
            TcpStream::connect_timeout(&address, CONNECT_TIMEOUT)
                .map(Connection::Tcp)
                .map_err(connect_failed)
        }
        #[cfg(unix)]
        SocketEndpoint::Unix { path } => connect_unix(path.as_str()).map_err(connect_failed),
        #[cfg(not(unix))]
        SocketEndpoint::Unix { .. } => Err(AppError::UnixUnsupported(endpoint.to_string())),
    }
}

fn first_address(host: &str, port: u16) -> io::Result<SocketAddr> {
    (host, port).to_socket_addrs()?.next().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("{host}:{port} resolved to no addresses"),
        )
    })
}

/// Connects through `socket2` so the Unix connect honours the timeout too.
#[cfg(unix)]
fn connect_unix(path: &str) -> io::Result<Connection> {
    let socket = Socket::new(Domain::UNIX, Type::STREAM, None)?;
    socket.connect_timeout(&SockAddr::unix(path)?, CONNECT_TIMEOUT)?;
    Ok(Connection::Unix(UnixStream::from(socket)))
}
