// src/lexer/tables/mod.rs
pub mod build;
pub mod dfa;
pub mod io;
pub mod tokens;

use std::{fmt, str::FromStr};

pub use build::{build_tables, materialize};
pub use io::{
    TablesError, load_tables_bin_bytes, load_tables_json_bytes, save_tables_bin, save_tables_json,
    write_tables_bin,
};
pub use tokens::{NO_TOKEN, Token, TokenIndex};

use crate::lexer::nfa::StateId;

/// Reject sink; never accepts and only loops to itself.
pub const DEAD_STATE: StateId = 0;
/// Row of the initial configuration.
pub const INIT_STATE: StateId = 1;

/// How input symbols map to table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColumnLayout {
    /// Column = code point; width = largest discovered code point + 1.
    #[default]
    Raw,
    /// Column = rank in the sorted discovered alphabet.
    Dense,
}

impl fmt::Display for ColumnLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ColumnLayout::Raw => "raw",
            ColumnLayout::Dense => "dense",
        })
    }
}

impl FromStr for ColumnLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "raw" => Ok(ColumnLayout::Raw),
            "dense" => Ok(ColumnLayout::Dense),
            other => Err(format!("unknown column layout '{other}' (expected raw|dense)")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub layout: ColumnLayout,
}

/// Dense transition and accept tables of a compiled rule set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DfaTables {
    pub layout: ColumnLayout,
    pub alphabet: Vec<char>,   // ascending
    pub width: u32,            // columns per row
    pub transitions: Vec<u32>, // rows * width, row-major
    pub accept: Vec<u32>,      // row -> token index or NO_TOKEN
}

impl DfaTables {
    /// Rows, counting the dead state.
    pub fn state_count(&self) -> usize {
        self.accept.len()
    }

    pub fn column(&self, symbol: char) -> Option<usize> {
        match self.layout {
            ColumnLayout::Raw => {
                let col = symbol as usize;
                (col < self.width as usize).then_some(col)
            }
            ColumnLayout::Dense => self.alphabet.binary_search(&symbol).ok(),
        }
    }

    /// Raw table step. Panics if `column` is outside the table.
    #[inline]
    pub fn next(&self, state: StateId, column: usize) -> StateId {
        let width = self.width as usize;
        assert!(column < width, "column {column} outside table width {width}");
        self.transitions[state as usize * width + column]
    }

    #[inline]
    pub fn accept(&self, state: StateId) -> Option<TokenIndex> {
        match self.accept[state as usize] {
            NO_TOKEN => None,
            t => Some(t),
        }
    }

    pub fn row(&self, state: StateId) -> &[u32] {
        let width = self.width as usize;
        let lo = state as usize * width;
        &self.transitions[lo..lo + width]
    }

    /// Structural checks used after loading tables from disk.
    pub fn validate(&self) -> Result<(), TablesError> {
        let rows = self.state_count();
        if rows < 2 {
            return Err(TablesError::Invalid(format!("{rows} rows; need dead and init rows")));
        }
        let expected = rows
            .checked_mul(self.width as usize)
            .ok_or_else(|| TablesError::Invalid("rows*width overflow".into()))?;
        if self.transitions.len() != expected {
            return Err(TablesError::Invalid(format!(
                "transition table has {} entries, expected {expected}",
                self.transitions.len()
            )));
        }
        if let Some(bad) = self.transitions.iter().find(|&&t| t as usize >= rows) {
            return Err(TablesError::Invalid(format!("transition target {bad} >= {rows}")));
        }
        if self.row(DEAD_STATE).iter().any(|&t| t != DEAD_STATE)
            || self.accept[DEAD_STATE as usize] != NO_TOKEN
        {
            return Err(TablesError::Invalid("dead state is not a sink".into()));
        }
        if !self.alphabet.windows(2).all(|w| w[0] < w[1]) {
            return Err(TablesError::Invalid("alphabet is not strictly ascending".into()));
        }
        let dense_width = match self.layout {
            ColumnLayout::Raw => self.alphabet.last().map_or(0, |&c| c as usize + 1),
            ColumnLayout::Dense => self.alphabet.len(),
        };
        if dense_width != self.width as usize {
            return Err(TablesError::Invalid(format!(
                "width {} does not match {} layout of the alphabet",
                self.width, self.layout
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_parses_and_prints() {
        for layout in [ColumnLayout::Raw, ColumnLayout::Dense] {
            assert_eq!(layout.to_string().parse::<ColumnLayout>(), Ok(layout));
        }
        assert!("sparse".parse::<ColumnLayout>().is_err());
    }
}
