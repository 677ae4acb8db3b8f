//! Tokenizer for NUL-delimited control messages.
//!
//! A message is a run of NUL-terminated fields closed by a second NUL byte.
//! [`Lexer`] hands out one field at a time as a borrowed [`Token`]. Once the
//! closing sentinel is reached the cursor stops moving and every later read
//! yields a zero-length token, which callers treat as "argument omitted".

use std::borrow::Cow;
use std::fmt;
use std::str::Utf8Error;

use spindle_protocol::FIELD_TERMINATOR;

/// Borrowed view of one field within a message buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    offset: usize,
    bytes: &'a [u8],
}

impl<'a> Token<'a> {
    /// Builds a token over `bytes`, located `offset` bytes into its message.
    pub fn new(offset: usize, bytes: &'a [u8]) -> Self {
        Self { offset, bytes }
    }

    /// Returns true when the token carries at least one byte.
    ///
    /// A zero-length token marks an omitted argument or an exhausted message.
    pub fn is_valid(&self) -> bool {
        !self.bytes.is_empty()
    }

    /// Position of the token's first byte within the message buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of bytes in the token.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true for zero-length tokens.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Raw token bytes.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Exact, case-sensitive comparison against a literal.
    pub fn matches(&self, literal: &str) -> bool {
        self.bytes == literal.as_bytes()
    }

    /// Borrows the token as UTF-8 text.
    pub fn as_str(&self) -> Result<&'a str, Utf8Error> {
        std::str::from_utf8(self.bytes)
    }

    /// Lossy text used when echoing the token back in diagnostics.
    pub fn lossy(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.bytes)
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.lossy())
    }
}

/// Cursor over a message buffer.
///
/// The lexer never reads past the buffer: a field without a terminator ends
/// at the end of the buffer.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    buffer: &'a [u8],
    cursor: usize,
}

impl<'a> Lexer<'a> {
    /// Starts lexing at the beginning of `buffer`.
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, cursor: 0 }
    }

    /// Current cursor position.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Returns the next field and advances past its terminator.
    ///
    /// The cursor does not step over a terminator that is immediately followed
    /// by another NUL byte, so the end-of-message sentinel is sticky.
    pub fn next_token(&mut self) -> Token<'a> {
        let token = self.peek_field();
        let terminator = self.cursor + token.len();
        let at_terminator = self.buffer.get(terminator) == Some(&FIELD_TERMINATOR);
        let more_fields = self
            .buffer
            .get(terminator + 1)
            .is_some_and(|byte| *byte != FIELD_TERMINATOR);

        self.cursor = if at_terminator && more_fields {
            terminator + 1
        } else {
            terminator
        };
        token
    }

    /// Returns the raw field at the cursor without consuming it.
    ///
    /// Commands that take a free-form value read it through this accessor so
    /// that interior whitespace survives untouched.
    pub fn remainder(&self) -> Token<'a> {
        self.peek_field()
    }

    fn peek_field(&self) -> Token<'a> {
        let rest = self.buffer.get(self.cursor..).unwrap_or_default();
        let length = rest
            .iter()
            .position(|byte| *byte == FIELD_TERMINATOR)
            .unwrap_or(rest.len());
        let (bytes, _) = rest.split_at(length);
        Token::new(self.cursor, bytes)
    }
}

/// Yields valid tokens until the first omitted one.
impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        token.is_valid().then_some(token)
    }
}
