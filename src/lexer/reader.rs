// src/lexer/reader.rs

use std::{fmt, str::Chars};

/// Location of a symbol in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Chars consumed before this symbol.
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const START: Position = Position {
        offset: 0,
        line: 1,
        column: 1,
    };

    fn advance(&mut self, consumed: char) {
        self.offset += 1;
        if consumed == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Single-symbol lookahead over an input stream.
pub trait Reader {
    /// The current symbol without consuming it; `None` at end of input.
    fn head(&self) -> Option<char>;
    /// Consumes the current symbol and returns it; `None` at end of input.
    fn peek(&mut self) -> Option<char>;
    /// Position of the current head.
    fn position(&self) -> Position;
}

pub struct StrReader<'a> {
    chars: Chars<'a>,
    head: Option<char>,
    position: Position,
}

impl<'a> StrReader<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut chars = input.chars();
        let head = chars.next();
        StrReader {
            chars,
            head,
            position: Position::START,
        }
    }
}

impl Reader for StrReader<'_> {
    #[inline]
    fn head(&self) -> Option<char> {
        self.head
    }

    fn peek(&mut self) -> Option<char> {
        let consumed = self.head?;
        self.position.advance(consumed);
        self.head = self.chars.next();
        Some(consumed)
    }

    fn position(&self) -> Position {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_lines_and_columns() {
        let mut r = StrReader::new("ab\ncd");
        assert_eq!(r.head(), Some('a'));
        assert_eq!(r.position(), Position::START);
        r.peek();
        r.peek();
        assert_eq!(r.head(), Some('\n'));
        assert_eq!(r.position().to_string(), "1:3");
        assert_eq!(r.peek(), Some('\n'));
        assert_eq!(r.head(), Some('c'));
        assert_eq!(
            r.position(),
            Position {
                offset: 3,
                line: 2,
                column: 1
            }
        );
    }

    #[test]
    fn peek_returns_the_consumed_symbol() {
        let mut r = StrReader::new("ab");
        assert_eq!(r.peek(), Some('a'));
        assert_eq!(r.head(), Some('b'));
        assert_eq!(r.peek(), Some('b'));
        assert_eq!(r.position().offset, 2);
    }

    #[test]
    fn peek_past_end_is_stable() {
        let mut r = StrReader::new("é");
        assert_eq!(r.peek(), Some('é'));
        assert_eq!(r.head(), None);
        assert_eq!(r.peek(), None);
        assert_eq!(r.peek(), None);
        assert_eq!(r.position().offset, 1);
        assert_eq!(StrReader::new("").head(), None);
    }
}
