// src/lexer/tables/tokens.rs

use std::{fmt, sync::Arc};

use crate::lexer::reader::Position;

/// Rule index; doubles as priority (lower wins).
pub type TokenIndex = u32;

// Accept-table entry for states that classify as no rule.
pub const NO_TOKEN: TokenIndex = TokenIndex::MAX;

/// A finished match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub index: TokenIndex,
    pub name: Arc<str>,
    pub text: String,
    pub start: Position,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {:?}", self.name, self.text)
    }
}
