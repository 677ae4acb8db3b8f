//! Selectors naming the target of a query.
//!
//! A selector pairs the token it was read from with the resolved target, or
//! with nothing when the token did not parse. Each domain decides which kind
//! of selector an argument position expects and calls the matching
//! constructor.

use super::lexer::Token;

/// Cardinal direction relative to the focused element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Parses an exact lowercase direction name.
    pub fn parse(token: &Token<'_>) -> Option<Self> {
        [
            ("north", Self::North),
            ("east", Self::East),
            ("south", Self::South),
            ("west", Self::West),
        ]
        .into_iter()
        .find_map(|(name, direction)| token.matches(name).then_some(direction))
    }
}

/// Resolved target of a selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorTarget {
    Direction(Direction),
    /// One-based display index.
    Display(u32),
    /// One-based space index.
    Space(u64),
    /// Window handle.
    Window(u32),
}

/// A parsed selector argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selector<'a> {
    token: Token<'a>,
    target: Option<SelectorTarget>,
}

impl<'a> Selector<'a> {
    /// Reads a direction selector.
    pub fn direction(token: Token<'a>) -> Self {
        let target = Direction::parse(&token).map(SelectorTarget::Direction);
        Self { token, target }
    }

    /// Reads a display index selector.
    pub fn display(token: Token<'a>) -> Self {
        let target = parse_index::<u32>(&token).map(SelectorTarget::Display);
        Self { token, target }
    }

    /// Reads a space index selector.
    pub fn space(token: Token<'a>) -> Self {
        let target = parse_index::<u64>(&token).map(SelectorTarget::Space);
        Self { token, target }
    }

    /// Reads a window handle selector.
    pub fn window(token: Token<'a>) -> Self {
        let target = token
            .as_str()
            .ok()
            .and_then(|text| text.parse::<u32>().ok())
            .map(SelectorTarget::Window);
        Self { token, target }
    }

    /// Token the selector was read from.
    pub fn token(&self) -> Token<'a> {
        self.token
    }

    /// Resolved target, when parsing succeeded.
    pub fn target(&self) -> Option<SelectorTarget> {
        self.target
    }

    /// Whether the token resolved to a target.
    pub fn did_parse(&self) -> bool {
        self.target.is_some()
    }
}

fn parse_index<T>(token: &Token<'_>) -> Option<T>
where
    T: std::str::FromStr + PartialEq + Default,
{
    let value = token.as_str().ok()?.parse::<T>().ok()?;
    (value != T::default()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn token(text: &str) -> Token<'_> {
        Token::new(0, text.as_bytes())
    }

    #[rstest]
    #[case("north", Some(Direction::North))]
    #[case("west", Some(Direction::West))]
    #[case("North", None)]
    #[case("up", None)]
    fn parses_directions(#[case] input: &str, #[case] expected: Option<Direction>) {
        let selector = Selector::direction(token(input));
        assert_eq!(selector.target(), expected.map(SelectorTarget::Direction));
        assert_eq!(selector.did_parse(), expected.is_some());
    }

    #[test]
    fn display_indices_are_one_based() {
        assert_eq!(
            Selector::display(token("2")).target(),
            Some(SelectorTarget::Display(2))
        );
        assert!(!Selector::display(token("0")).did_parse());
        assert!(!Selector::display(token("-1")).did_parse());
    }

    #[test]
    fn space_indices_accept_wide_values() {
        assert_eq!(
            Selector::space(token("4294967296")).target(),
            Some(SelectorTarget::Space(4_294_967_296))
        );
    }

    #[test]
    fn window_handles_keep_their_token() {
        let selector = Selector::window(token("1234"));
        assert_eq!(selector.target(), Some(SelectorTarget::Window(1234)));
        assert!(selector.token().matches("1234"));
        assert!(!Selector::window(token("focused")).did_parse());
    }
}
