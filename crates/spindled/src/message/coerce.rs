//! Conversions from message tokens to typed setting values.

use thiserror::Error;

use super::lexer::{Lexer, Token};

/// Literal enabling a toggle.
pub const TOGGLE_ON: &str = "on";
/// Literal disabling a toggle.
pub const TOGGLE_OFF: &str = "off";

/// Reasons a token could not be converted into a setting value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CoercionError {
    /// The token was neither `on` nor `off`.
    #[error("expected '{TOGGLE_ON}' or '{TOGGLE_OFF}'")]
    Toggle,
    /// The token did not scan as a non-zero hexadecimal number.
    #[error("expected a non-zero hexadecimal colour")]
    Color,
    /// The token bytes were not valid UTF-8.
    #[error("value is not valid UTF-8")]
    Encoding,
}

/// Parses an exact `on` / `off` literal.
pub fn parse_toggle(token: &Token<'_>) -> Result<bool, CoercionError> {
    if token.matches(TOGGLE_ON) {
        Ok(true)
    } else if token.matches(TOGGLE_OFF) {
        Ok(false)
    } else {
        Err(CoercionError::Toggle)
    }
}

/// Text form of a toggle value.
pub fn toggle_str(value: bool) -> &'static str {
    if value { TOGGLE_ON } else { TOGGLE_OFF }
}

/// Parses an ARGB colour.
///
/// Zero is indistinguishable from a failed scan and is rejected along with
/// it, so a fully transparent black cannot be configured.
pub fn parse_color(token: &Token<'_>) -> Result<u32, CoercionError> {
    match scan_hex(token.as_bytes()) {
        Some(0) | None => Err(CoercionError::Color),
        Some(color) => Ok(color),
    }
}

/// Scans a hexadecimal number the way C's `%x` conversion does.
///
/// Leading ASCII whitespace, an optional `+` / `-` sign and an optional
/// `0x` / `0X` prefix are skipped, the longest run of hex digits is
/// converted, and anything after it is ignored. A minus sign negates modulo
/// 2^32. Digits saturate at `u64::MAX` and the result keeps the low 32 bits,
/// matching a `strtoul` result stored into a `uint32_t`. Returns `None` when
/// no digit is present.
pub fn scan_hex(bytes: &[u8]) -> Option<u32> {
    let start = bytes
        .iter()
        .position(|byte| !byte.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let (_, trimmed) = bytes.split_at(start);
    let (negative, unsigned) = match trimmed {
        [b'-', rest @ ..] => (true, rest),
        [b'+', rest @ ..] => (false, rest),
        other => (false, other),
    };
    let digits = match unsigned {
        [b'0', b'x' | b'X', rest @ ..] if rest.first().is_some_and(u8::is_ascii_hexdigit) => {
            rest
        }
        other => other,
    };

    let mut value: Option<u64> = None;
    for byte in digits.iter().take_while(|byte| byte.is_ascii_hexdigit()) {
        let digit = u64::from(char::from(*byte).to_digit(16)?);
        let accumulated = value.unwrap_or(0);
        value = Some(
            accumulated
                .checked_mul(16)
                .and_then(|shifted| shifted.checked_add(digit))
                .unwrap_or(u64::MAX),
        );
    }
    let magnitude = value?;
    let signed = if negative && magnitude != u64::MAX {
        magnitude.wrapping_neg()
    } else {
        magnitude
    };
    u32::try_from(signed & u64::from(u32::MAX)).ok()
}

/// Copies a token into an owned string.
pub fn owned_string(token: &Token<'_>) -> Result<String, CoercionError> {
    token
        .as_str()
        .map(str::to_owned)
        .map_err(|_| CoercionError::Encoding)
}

/// Consumes every remaining valid token as an ordered list of strings.
///
/// Tokens are taken until the first omitted one. On an encoding failure the
/// offending token is returned alongside the error; the lexer is drained
/// either way.
pub fn collect_strings<'a>(
    lexer: &mut Lexer<'a>,
) -> Result<Vec<String>, (Token<'a>, CoercionError)> {
    let mut values = Vec::new();
    let mut failure = None;
    for token in lexer.by_ref() {
        match owned_string(&token) {
            Ok(value) => values.push(value),
            Err(error) if failure.is_none() => failure = Some((token, error)),
            Err(_) => {}
        }
    }
    match failure {
        Some(failure) => Err(failure),
        None => Ok(values),
    }
}
