//! Event queue feeding the daemon's single state owner.
//!
//! Connection readers never touch [`DaemonState`]. They copy each message into
//! an [`Event::DaemonMessage`] and post it to the [`EventQueue`]. One worker
//! thread drains the queue in FIFO order, dispatches every message against the
//! state it owns, and writes the response to the message's connection.

use std::fmt;
use std::io::Write;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::message::{DomainRouter, ResponseSink};
use crate::state::DaemonState;

pub(crate) const EVENTS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::events");

/// Writable side of the client connection that sent a message.
pub type ResponseChannel = Box<dyn Write + Send>;

/// Work items processed by the event loop.
pub enum Event {
    /// A control message together with the connection awaiting its response.
    DaemonMessage {
        payload: Vec<u8>,
        connection: Option<ResponseChannel>,
    },
    /// Stops the loop once every earlier event has been handled.
    Shutdown,
}

impl fmt::Debug for Event {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DaemonMessage {
                payload,
                connection,
            } => formatter
                .debug_struct("DaemonMessage")
                .field("bytes", &payload.len())
                .field("has_connection", &connection.is_some())
                .finish(),
            Self::Shutdown => formatter.write_str("Shutdown"),
        }
    }
}

/// Errors surfaced by the event loop.
#[derive(Debug, Error)]
pub enum EventLoopError {
    #[error("failed to spawn event loop thread: {source}")]
    Spawn {
        #[source]
        source: std::io::Error,
    },
    #[error("event loop has stopped accepting events")]
    Closed,
    #[error("event loop thread panicked")]
    ThreadPanic,
}

/// Cloneable handle used to post events to the loop.
#[derive(Debug, Clone)]
pub struct EventQueue {
    sender: Sender<Event>,
}

impl EventQueue {
    /// Enqueues an event behind everything already posted.
    ///
    /// # Errors
    ///
    /// Returns [`EventLoopError::Closed`] once the loop has shut down.
    pub fn post(&self, event: Event) -> Result<(), EventLoopError> {
        self.sender.send(event).map_err(|_| EventLoopError::Closed)
    }

    /// Copies `payload` into a message event and enqueues it.
    ///
    /// # Errors
    ///
    /// Returns [`EventLoopError::Closed`] once the loop has shut down.
    pub fn post_message(
        &self,
        payload: &[u8],
        connection: Option<ResponseChannel>,
    ) -> Result<(), EventLoopError> {
        self.post(Event::DaemonMessage {
            payload: payload.to_vec(),
            connection,
        })
    }
}

/// Owner of the daemon state and the message router.
#[derive(Debug, Default)]
pub struct EventLoop {
    state: DaemonState,
    router: DomainRouter,
}

impl EventLoop {
    /// Builds a loop that will own `state`.
    pub fn new(state: DaemonState) -> Self {
        Self {
            state,
            router: DomainRouter::new(),
        }
    }

    /// Starts the worker thread.
    ///
    /// # Errors
    ///
    /// Returns [`EventLoopError::Spawn`] if the thread cannot be created.
    pub fn spawn(self) -> Result<EventLoopHandle, EventLoopError> {
        let (sender, receiver) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("spindled-events".to_owned())
            .spawn(move || self.run(receiver))
            .map_err(|source| EventLoopError::Spawn { source })?;
        Ok(EventLoopHandle {
            queue: EventQueue { sender },
            handle,
        })
    }

    /// Handles a single event. Returns `false` when the loop should stop.
    pub fn process(&mut self, event: Event) -> bool {
        match event {
            Event::DaemonMessage {
                payload,
                connection,
            } => {
                self.dispatch(&payload, connection);
                true
            }
            Event::Shutdown => false,
        }
    }

    /// State owned by the loop.
    pub fn state(&self) -> &DaemonState {
        &self.state
    }

    fn run(mut self, receiver: Receiver<Event>) -> DaemonState {
        debug!(target: EVENTS_TARGET, "event loop started");
        while let Ok(event) = receiver.recv() {
            if !self.process(event) {
                break;
            }
        }
        info!(target: EVENTS_TARGET, "event loop stopped");
        self.state
    }

    fn dispatch(&mut self, payload: &[u8], connection: Option<ResponseChannel>) {
        let result = match connection {
            Some(mut connection) => {
                let mut sink = ResponseSink::new(&mut *connection);
                self.router.route(&mut self.state, &mut sink, payload)
            }
            None => {
                let mut sink = ResponseSink::discard();
                self.router.route(&mut self.state, &mut sink, payload)
            }
        };
        if !result.succeeded() {
            warn!(
                target: EVENTS_TARGET,
                failures = result.failures,
                "message reported failures"
            );
        }
    }
}

/// Running event loop.
#[derive(Debug)]
pub struct EventLoopHandle {
    queue: EventQueue,
    handle: JoinHandle<DaemonState>,
}

impl EventLoopHandle {
    /// Returns a queue handle for posting events.
    pub fn queue(&self) -> EventQueue {
        self.queue.clone()
    }

    /// Posts [`Event::Shutdown`] behind pending events and waits for the
    /// worker to finish. Returns the final daemon state.
    ///
    /// # Errors
    ///
    /// Returns [`EventLoopError::ThreadPanic`] if the worker panicked.
    pub fn shutdown(self) -> Result<DaemonState, EventLoopError> {
        // A closed queue means the worker already exited; joining reports why.
        let _ = self.queue.post(Event::Shutdown);
        self.handle.join().map_err(|_| EventLoopError::ThreadPanic)
    }
}
