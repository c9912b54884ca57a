// src/lexer/automaton.rs
// Table-driven DFA cursor. The tables are shared; the cursor is per scan.

use super::{
    nfa::StateId,
    tables::{DEAD_STATE, DfaTables, INIT_STATE, TokenIndex},
};

#[derive(Debug, Clone)]
pub struct Automaton<'t> {
    tables: &'t DfaTables,
    current: StateId,
    last: Option<StateId>,
}

impl<'t> Automaton<'t> {
    pub fn new(tables: &'t DfaTables) -> Self {
        Automaton {
            tables,
            current: INIT_STATE,
            last: None,
        }
    }

    /// Steps on `symbol` and returns the classification of the state that
    /// was current before the step. End of input and symbols without a
    /// column move to the dead state.
    pub fn input(&mut self, symbol: Option<char>) -> Option<TokenIndex> {
        let column = symbol.and_then(|c| self.tables.column(c));
        let next = match column {
            Some(col) => self.tables.next(self.current, col),
            None => DEAD_STATE,
        };
        self.step(next)
    }

    /// Raw step on a table column. Panics if `column` is outside the table.
    pub fn input_column(&mut self, column: usize) -> Option<TokenIndex> {
        let next = self.tables.next(self.current, column);
        self.step(next)
    }

    #[inline]
    fn step(&mut self, next: StateId) -> Option<TokenIndex> {
        let prev = self.current;
        self.last = Some(prev);
        self.current = next;
        self.tables.accept(prev)
    }

    pub fn stop(&self) -> bool {
        self.current == DEAD_STATE
    }

    pub fn reset(&mut self) {
        self.current = INIT_STATE;
        self.last = None;
    }

    pub fn current(&self) -> StateId {
        self.current
    }

    pub fn last(&self) -> Option<StateId> {
        self.last
    }

    pub fn tables(&self) -> &'t DfaTables {
        self.tables
    }
}
