//! Failures reported back to the sender of a control message.
//!
//! None of these are fatal: the dispatcher writes the diagnostic to the
//! response sink and the daemon keeps serving. The display strings are the
//! diagnostics clients see after the failure marker.

use thiserror::Error;

/// Errors surfaced while routing or applying a control message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    /// The first field matched no known domain.
    #[error("unknown domain '{domain}'")]
    UnknownDomain { domain: String },

    /// The command field matched nothing in the domain's vocabulary.
    #[error("unknown command '{command}' for domain '{domain}'")]
    UnknownCommand { domain: String, command: String },

    /// An argument failed coercion to the command's value type.
    #[error("unknown value '{value}' given to command '{command}' for domain '{domain}'")]
    UnknownValue {
        domain: String,
        command: String,
        value: String,
    },

    /// An argument was not valid UTF-8 and could not be stored.
    #[error("value given to command '{command}' for domain '{domain}' is not valid UTF-8")]
    InvalidEncoding { domain: String, command: String },

    /// A list was stored but holds the wrong number of entries.
    #[error("value for '{command}' must contain exactly {expected} symbols separated by whitespace.")]
    ListLength {
        command: String,
        expected: ExpectedCount,
        actual: usize,
    },
}

impl MessageError {
    /// Creates an unknown domain error.
    pub fn unknown_domain(domain: impl Into<String>) -> Self {
        Self::UnknownDomain {
            domain: domain.into(),
        }
    }

    /// Creates an unknown command error.
    pub fn unknown_command(domain: impl Into<String>, command: impl Into<String>) -> Self {
        Self::UnknownCommand {
            domain: domain.into(),
            command: command.into(),
        }
    }

    /// Creates an unknown value error.
    pub fn unknown_value(
        domain: impl Into<String>,
        command: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::UnknownValue {
            domain: domain.into(),
            command: command.into(),
            value: value.into(),
        }
    }

    /// Creates an invalid encoding error.
    pub fn invalid_encoding(domain: impl Into<String>, command: impl Into<String>) -> Self {
        Self::InvalidEncoding {
            domain: domain.into(),
            command: command.into(),
        }
    }

    /// Creates a list length error.
    pub fn list_length(command: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::ListLength {
            command: command.into(),
            expected: ExpectedCount(expected),
            actual,
        }
    }

    /// Short label logged alongside rejected messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownDomain { .. } => "unknown_domain",
            Self::UnknownCommand { .. } => "unknown_command",
            Self::UnknownValue { .. } => "unknown_value",
            Self::InvalidEncoding { .. } => "invalid_encoding",
            Self::ListLength { .. } => "list_length",
        }
    }
}

/// Entry count spelled out in diagnostics ("exactly two symbols").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedCount(pub usize);

impl std::fmt::Display for ExpectedCount {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const WORDS: [&str; 5] = ["zero", "one", "two", "three", "four"];
        match WORDS.get(self.0) {
            Some(word) => formatter.write_str(word),
            None => write!(formatter, "{}", self.0),
        }
    }
}
