//! Control message parsing and dispatch.
//!
//! A control message is a sequence of NUL-terminated fields closed by an extra
//! NUL. The first field names a domain and the second a command; any further
//! fields are the command's arguments:
//!
//! ```text
//! config\0status_bar_power_icon_strip\0\u{f0e7}\0\u{f240}\0\0
//! ```
//!
//! Queries answer with a single value line. Mutations answer with nothing on
//! success. Every failure writes one line starting with
//! [`spindle_protocol::FAILURE_MARKER`].

pub mod coerce;
pub mod config_domain;
mod errors;
mod lexer;
mod response;
mod router;
pub mod selector;

pub use self::errors::{ExpectedCount, MessageError};
pub use self::lexer::{Lexer, Token};
pub use self::response::ResponseSink;
pub use self::router::{DispatchResult, Domain, DomainRouter};

use crate::state::SettingsStore;

/// Parses and handles one message, writing any response to `sink`.
pub fn handle_message(
    store: &mut dyn SettingsStore,
    sink: &mut ResponseSink<'_>,
    message: &[u8],
) -> DispatchResult {
    DomainRouter::new().route(store, sink, message)
}
