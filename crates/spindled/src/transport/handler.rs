//! Connection handling for the daemon listener.

use std::io::{self, Read, Write};
use std::net::TcpStream;

use spindle_protocol::{FAILURE_MARKER, message_length};
use tracing::{debug, warn};

use crate::events::EventQueue;

use super::LISTENER_TARGET;

#[cfg(unix)]
use std::os::unix::net::UnixStream;

/// Largest message a client may send, sentinel included.
pub(crate) const MAX_MESSAGE_BYTES: usize = 64 * 1024;

/// Stream types accepted by the daemon listener.
pub(crate) enum ConnectionStream {
    Tcp(TcpStream),
    #[cfg(unix)]
    Unix(UnixStream),
}

impl Read for ConnectionStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Tcp(stream) => stream.read(buf),
            #[cfg(unix)]
            Self::Unix(stream) => stream.read(buf),
        }
    }
}

impl Write for ConnectionStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Tcp(stream) => stream.write(buf),
            #[cfg(unix)]
            Self::Unix(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Tcp(stream) => stream.flush(),
            #[cfg(unix)]
            Self::Unix(stream) => stream.flush(),
        }
    }
}

/// Handles accepted socket connections.
pub(crate) trait ConnectionHandler: Send + Sync + 'static {
    /// Handles a single connection. Implementations should avoid panicking.
    fn handle(&self, stream: ConnectionStream);
}

/// Reads one message per connection and posts it to the event loop.
///
/// The connection travels with the message so the event loop can answer on
/// it; it closes once the response has been written.
#[derive(Debug, Clone)]
pub(crate) struct MessageHandoff {
    queue: EventQueue,
}

impl MessageHandoff {
    pub(crate) fn new(queue: EventQueue) -> Self {
        Self { queue }
    }
}

impl ConnectionHandler for MessageHandoff {
    fn handle(&self, mut stream: ConnectionStream) {
        let message = match read_message(&mut stream) {
            Ok(Some(message)) => message,
            Ok(None) => {
                debug!(target: LISTENER_TARGET, "client disconnected without a message");
                return;
            }
            Err(error) => {
                warn!(target: LISTENER_TARGET, %error, "failed to read message");
                reply_failure(&mut stream, &error);
                return;
            }
        };

        if let Err(error) = self
            .queue
            .post_message(&message, Some(Box::new(stream)))
        {
            // The stream moved into the rejected event and is closed with it.
            warn!(target: LISTENER_TARGET, %error, "dropping message");
        }
    }
}

/// Reads until the closing NUL pair or end of stream.
///
/// Returns `Ok(None)` if the client sent nothing. A stream that ends without
/// the sentinel yields whatever arrived; the lexer treats the end of the
/// buffer as the end of the message. Bytes after the sentinel are ignored.
fn read_message(stream: &mut impl Read) -> io::Result<Option<Vec<u8>>> {
    let mut limited = stream.take(MAX_MESSAGE_BYTES as u64 + 1);
    let mut message = Vec::with_capacity(256);
    let mut scratch = [0_u8; 1024];
    loop {
        let filled = match limited.read(&mut scratch) {
            Ok(0) => return Ok((!message.is_empty()).then_some(message)),
            Ok(filled) => filled,
            Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
            Err(error) => return Err(error),
        };
        // Search only the new bytes plus one for a sentinel split across reads.
        let search_from = message.len().saturating_sub(1);
        message.extend_from_slice(&scratch[..filled]);
        if let Some(length) = message_length(&message[search_from..]) {
            message.truncate(search_from + length);
        } else if message.len() <= MAX_MESSAGE_BYTES {
            continue;
        }
        if message.len() > MAX_MESSAGE_BYTES {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("message exceeds {MAX_MESSAGE_BYTES} bytes"),
            ));
        }
        return Ok(Some(message));
    }
}

fn reply_failure(stream: &mut ConnectionStream, error: &io::Error) {
    let result = writeln!(stream, "{FAILURE_MARKER}{error}").and_then(|()| stream.flush());
    if let Err(error) = result {
        warn!(target: LISTENER_TARGET, %error, "failed to report read failure");
    }
}
