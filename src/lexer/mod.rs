// src/lexer/mod.rs
pub mod alphabet;
pub mod automaton;
pub mod nfa;
pub mod reader;
pub mod regex;
pub mod rules;
pub mod scanner;
pub mod tables;

pub use automaton::Automaton;
pub use reader::{Position, Reader, StrReader};
pub use regex::Regex;
pub use rules::{Rule, RuleSet};
pub use scanner::{Lexer, ScanError, Scanner};
pub use tables::{BuildOptions, ColumnLayout, DfaTables, Token, TokenIndex};
