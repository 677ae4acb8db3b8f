//! In-process daemon reachable over a loopback TCP socket.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;

use spindle_config::SocketEndpoint;
use spindle_protocol::encode_message;

use crate::events::{EventLoop, EventLoopHandle};
use crate::state::DaemonState;
use crate::transport::{ListenerHandle, MessageHandoff, SocketListener};

/// Listener and event loop wired together the way the daemon runs them.
pub struct DaemonClient {
    addr: SocketAddr,
    listener: Option<ListenerHandle>,
    events: Option<EventLoopHandle>,
}

impl DaemonClient {
    /// Starts a daemon on an ephemeral loopback port.
    #[must_use]
    pub fn start() -> Self {
        let events = EventLoop::default().spawn().expect("spawn event loop");
        let listener = SocketListener::bind(&SocketEndpoint::tcp("127.0.0.1", 0))
            .expect("bind loopback listener");
        let addr = listener.local_addr().expect("loopback address");
        let listener = listener
            .start(Arc::new(MessageHandoff::new(events.queue())))
            .expect("start listener");
        Self {
            addr,
            listener: Some(listener),
            events: Some(events),
        }
    }

    /// Sends one message and returns the full response.
    pub fn send<S: AsRef<[u8]>>(&self, fields: &[S]) -> String {
        let message = encode_message(fields).expect("encode message");
        let mut stream = TcpStream::connect(self.addr).expect("connect to daemon");
        stream.write_all(&message).expect("write message");
        let mut response = String::new();
        stream
            .read_to_string(&mut response)
            .expect("read response");
        response
    }

    /// Stops the listener, drains the event loop, and returns its state.
    pub fn shutdown(&mut self) -> Option<DaemonState> {
        if let Some(listener) = self.listener.take() {
            listener.shutdown();
            listener.join().expect("join listener");
        }
        self.events
            .take()
            .map(|events| events.shutdown().expect("join event loop"))
    }
}

impl Drop for DaemonClient {
    fn drop(&mut self) {
        if !std::thread::panicking() {
            self.shutdown();
        }
    }
}

/// Splits a `|`-separated step argument into message fields.
#[must_use]
pub fn field_list(fields: &str) -> Vec<String> {
    fields
        .trim_matches('"')
        .split('|')
        .map(str::to_owned)
        .collect()
}
