//! Wire format shared by the `spindled` control socket and its clients.
//!
//! A request is a flat byte buffer of NUL-terminated fields closed by one
//! extra NUL byte:
//!
//! ```text
//! config\0status_bar_clock_icon\0X\0\0
//! ```
//!
//! The first field names the domain, the second the command, and any further
//! fields are arguments. Responses are plain text. A successful query answers
//! with one value line, a successful mutation answers with nothing, and a
//! failure starts with [`FAILURE_MARKER`] followed by a diagnostic line.

use thiserror::Error;

/// Byte terminating every field of a request.
pub const FIELD_TERMINATOR: u8 = 0;

/// Prefix identifying a failure response.
pub const FAILURE_MARKER: &str = "error: ";

/// Errors raised while encoding a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// A field contained a NUL byte, which would split it on the wire.
    #[error("argument {index} contains a NUL byte")]
    EmbeddedNul {
        /// Zero-based position of the offending field.
        index: usize,
    },
    /// A field was empty, which the daemon would read as the end of the
    /// message.
    #[error("argument {index} is empty")]
    EmptyField {
        /// Zero-based position of the offending field.
        index: usize,
    },
}

/// Encodes request fields into the NUL-delimited wire format.
///
/// An empty field list still produces a well-formed message holding a single
/// empty field, which the daemon reports as an unknown domain.
///
/// # Errors
///
/// Returns [`EncodeError::EmbeddedNul`] when a field contains a NUL byte and
/// [`EncodeError::EmptyField`] when a field is empty.
pub fn encode_message<I, S>(fields: I) -> Result<Vec<u8>, EncodeError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<[u8]>,
{
    let mut message = Vec::new();
    let mut count = 0_usize;
    for (index, field) in fields.into_iter().enumerate() {
        let bytes = field.as_ref();
        if bytes.is_empty() {
            return Err(EncodeError::EmptyField { index });
        }
        if bytes.contains(&FIELD_TERMINATOR) {
            return Err(EncodeError::EmbeddedNul { index });
        }
        message.extend_from_slice(bytes);
        message.push(FIELD_TERMINATOR);
        count = index + 1;
    }
    if count == 0 {
        message.push(FIELD_TERMINATOR);
    }
    message.push(FIELD_TERMINATOR);
    Ok(message)
}

/// Returns the length of the first complete message in `buffer`.
///
/// The returned length includes both bytes of the closing NUL pair. `None`
/// means the sentinel has not arrived yet.
#[must_use]
pub fn message_length(buffer: &[u8]) -> Option<usize> {
    buffer
        .windows(2)
        .position(|pair| pair == [FIELD_TERMINATOR, FIELD_TERMINATOR])
        .map(|position| position + 2)
}

/// Returns the diagnostic of a failure response, or `None` on success.
#[must_use]
pub fn failure_diagnostic(response: &str) -> Option<&str> {
    response.strip_prefix(FAILURE_MARKER)
}
