//! Response sink for control messages.
//!
//! A query answers with one bare value line, a mutation answers with nothing,
//! and a failure writes [`FAILURE_MARKER`] followed by the diagnostic. When the
//! sender expects no reply the sink is built with [`ResponseSink::discard`]
//! and every write is dropped.

use std::fmt::Display;
use std::io::Write;

use spindle_protocol::FAILURE_MARKER;
use tracing::{debug, warn};

use super::errors::MessageError;
use super::router::DISPATCH_TARGET;

/// Borrowed writer that receives the response to one message.
pub struct ResponseSink<'a> {
    writer: Option<&'a mut dyn Write>,
    failures: usize,
}

impl<'a> ResponseSink<'a> {
    /// Wraps the writer associated with a request.
    pub fn new(writer: &'a mut dyn Write) -> Self {
        Self {
            writer: Some(writer),
            failures: 0,
        }
    }

    /// Builds a sink that drops every write.
    pub fn discard() -> Self {
        Self {
            writer: None,
            failures: 0,
        }
    }

    /// Writes a queried value as a single line.
    pub fn write_value(&mut self, value: impl Display) {
        self.write_line(format_args!("{value}"));
    }

    /// Writes a failure marker followed by the diagnostic line.
    pub fn fail(&mut self, error: &MessageError) {
        self.failures += 1;
        debug!(target: DISPATCH_TARGET, kind = error.kind(), %error, "message rejected");
        self.write_line(format_args!("{FAILURE_MARKER}{error}"));
    }

    /// Number of failures reported through this sink.
    pub fn failures(&self) -> usize {
        self.failures
    }

    /// Flushes the underlying writer, if any.
    pub fn flush(&mut self) {
        if let Some(writer) = self.writer.as_mut()
            && let Err(error) = writer.flush()
        {
            warn!(target: DISPATCH_TARGET, %error, "failed to flush response");
            self.writer = None;
        }
    }

    fn write_line(&mut self, line: std::fmt::Arguments<'_>) {
        let Some(writer) = self.writer.as_mut() else {
            return;
        };
        if let Err(error) = writeln!(writer, "{line}") {
            // The peer is gone; later writes for this request would fail too.
            warn!(target: DISPATCH_TARGET, %error, "failed to write response");
            self.writer = None;
        }
    }
}
