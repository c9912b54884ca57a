// src/lexer/scanner.rs
// Maximal-munch tokenizer over compiled tables.

use std::{sync::Arc, time::Instant};

use rayon::prelude::*;
use thiserror::Error;

use super::{
    automaton::Automaton,
    reader::{Position, Reader, StrReader},
    rules::RuleSet,
    tables::{DfaTables, INIT_STATE, Token, TokenIndex, build_tables},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("unmatched input {text:?} at {start}{}", found_suffix(.found))]
    UnmatchedToken {
        text: String,
        start: Position,
        /// Symbol that drove the automaton dead; `None` at end of input.
        found: Option<char>,
    },
}

fn found_suffix(found: &Option<char>) -> String {
    match found {
        Some(c) => format!(" (before {c:?})"),
        None => " (at end of input)".to_string(),
    }
}

/// Compiled rule set. Immutable; scans borrow it.
#[derive(Debug, Clone)]
pub struct Lexer {
    names: Vec<Arc<str>>,
    tables: DfaTables,
}

impl Lexer {
    pub fn compile(rules: &RuleSet) -> Self {
        let t0 = Instant::now();
        let nfa = rules.merged_nfa();
        let tables = build_tables(&nfa, rules.options());
        log::debug!(
            "[lexer] compiled {} rules into {} states in {:?}",
            rules.len(),
            tables.state_count(),
            t0.elapsed()
        );
        Self::from_tables(rules.rules().iter().map(|r| r.name.clone()).collect(), tables)
    }

    /// Pairs previously dumped tables with their rule names.
    pub fn from_tables(names: Vec<Arc<str>>, tables: DfaTables) -> Self {
        Lexer { names, tables }
    }

    pub fn tables(&self) -> &DfaTables {
        &self.tables
    }

    pub fn names(&self) -> &[Arc<str>] {
        &self.names
    }

    pub fn name(&self, index: TokenIndex) -> Option<&Arc<str>> {
        self.names.get(index as usize)
    }

    pub fn scan<R: Reader>(&self, reader: R) -> Scanner<'_, R> {
        let start = reader.position();
        Scanner {
            lexer: self,
            automaton: Automaton::new(&self.tables),
            reader,
            buffer: String::new(),
            start,
            done: false,
        }
    }

    pub fn tokenize(&self, input: &str) -> Result<Vec<Token>, ScanError> {
        self.scan(StrReader::new(input)).collect()
    }

    /// Independent inputs scanned in parallel over the shared tables.
    pub fn tokenize_batch(&self, inputs: &[&str]) -> Vec<Result<Vec<Token>, ScanError>> {
        inputs.par_iter().map(|s| self.tokenize(s)).collect()
    }
}

pub struct Scanner<'l, R> {
    lexer: &'l Lexer,
    automaton: Automaton<'l>,
    reader: R,
    buffer: String,
    start: Position,
    done: bool,
}

impl<R: Reader> Scanner<'_, R> {
    fn unmatched(&mut self, found: Option<char>) -> ScanError {
        self.done = true;
        ScanError::UnmatchedToken {
            text: std::mem::take(&mut self.buffer),
            start: self.start,
            found,
        }
    }
}

impl<R: Reader> Iterator for Scanner<'_, R> {
    type Item = Result<Token, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let head = loop {
            let c = self.reader.head();
            self.automaton.input(c);
            if self.automaton.stop() {
                break c;
            }
            // end of input always kills the automaton, so `c` is a symbol here
            if let Some(c) = c {
                self.buffer.push(c);
            }
            self.reader.peek();
        };

        if head.is_none() {
            self.done = true;
        }

        // An empty lexeme is never a token, even when the init state accepts.
        if self.buffer.is_empty() {
            return match head {
                None => None,
                Some(c) => {
                    // nothing consumed: report the offending symbol itself
                    self.buffer.push(c);
                    Some(Err(self.unmatched(Some(c))))
                }
            };
        }

        let last = self.automaton.last().unwrap_or(INIT_STATE);
        let item = match self.lexer.tables.accept(last) {
            None => Err(self.unmatched(head)),
            Some(index) => {
                let name = self
                    .lexer
                    .name(index)
                    .cloned()
                    .unwrap_or_else(|| Arc::from(format!("#{index}")));
                let token = Token {
                    index,
                    name,
                    text: std::mem::take(&mut self.buffer),
                    start: self.start,
                };
                log::trace!("[scan] {} @ {}", token, token.start);
                Ok(token)
            }
        };

        self.automaton.reset();
        self.start = self.reader.position();
        Some(item)
    }
}

impl<R: Reader> std::iter::FusedIterator for Scanner<'_, R> {}
