// src/lexer/tables/dfa.rs
// Subset construction: NFA configurations become DFA states.

use std::{collections::BTreeSet, rc::Rc};

use hashbrown::HashMap;

use super::{INIT_STATE, tokens::TokenIndex};
use crate::lexer::nfa::{Nfa, StateId};

/// Sorted NFA state ids making up one configuration.
pub type Signature = Rc<[StateId]>;

#[derive(Debug, Clone)]
pub struct DfaState {
    pub index: StateId,
    pub token: Option<TokenIndex>,
    pub signature: Signature,
    /// Explicit transitions in discovery order.
    pub edges: Vec<(char, StateId)>,
}

/// Graph form of the automaton, before the dense tables are laid out.
#[derive(Debug, Clone)]
pub struct DfaModel {
    // states[i] has index i + 1; index 0 is the implicit dead state
    states: Vec<DfaState>,
    alphabet: BTreeSet<char>,
}

impl DfaModel {
    pub fn build(nfa: &Nfa) -> Self {
        SubsetBuilder::new(nfa).run()
    }

    pub fn init(&self) -> &DfaState {
        self.state(INIT_STATE)
    }

    pub fn state(&self, index: StateId) -> &DfaState {
        assert!(index != 0, "the dead state has no graph node");
        &self.states[index as usize - 1]
    }

    pub fn states(&self) -> &[DfaState] {
        &self.states
    }

    /// Live states, not counting the dead state.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Every symbol that appears on an explicit NFA edge reached during construction.
    pub fn alphabet(&self) -> &BTreeSet<char> {
        &self.alphabet
    }
}

struct SubsetBuilder<'a> {
    nfa: &'a Nfa,
    // per-state closures; valid for this build only
    closures: HashMap<StateId, Rc<[StateId]>>,
    interner: HashMap<Signature, StateId>,
    states: Vec<DfaState>,
    alphabet: BTreeSet<char>,
}

impl<'a> SubsetBuilder<'a> {
    fn new(nfa: &'a Nfa) -> Self {
        SubsetBuilder {
            nfa,
            closures: HashMap::new(),
            interner: HashMap::new(),
            states: Vec::new(),
            alphabet: BTreeSet::new(),
        }
    }

    fn run(mut self) -> DfaModel {
        let start = self.closure([self.nfa.init()]);
        let (init, _) = self.intern(start);
        debug_assert_eq!(init, INIT_STATE);

        let mut work = vec![init];
        while let Some(current) = work.pop() {
            let signature = self.states[current as usize - 1].signature.clone();

            let symbols: BTreeSet<char> = signature
                .iter()
                .flat_map(|&s| self.nfa.state(s).symbols())
                .collect();
            self.alphabet.extend(symbols.iter().copied());

            for symbol in symbols {
                let target = self.move_and_closure(&signature, symbol);
                if target.is_empty() {
                    continue;
                }
                let (index, fresh) = self.intern(target);
                if fresh {
                    work.push(index);
                }
                self.states[current as usize - 1].edges.push((symbol, index));
            }
        }

        DfaModel {
            states: self.states,
            alphabet: self.alphabet,
        }
    }

    fn state_closure(&mut self, state: StateId) -> Rc<[StateId]> {
        if let Some(hit) = self.closures.get(&state) {
            return hit.clone();
        }
        let mut seen = BTreeSet::from([state]);
        let mut work = vec![state];
        while let Some(s) = work.pop() {
            for &next in self.nfa.state(s).epsilon_targets() {
                if seen.insert(next) {
                    work.push(next);
                }
            }
        }
        let closure: Rc<[StateId]> = seen.into_iter().collect();
        self.closures.insert(state, closure.clone());
        closure
    }

    /// Closure distributes over union, so a set's closure is the union of
    /// the cached single-state closures.
    fn closure<I: IntoIterator<Item = StateId>>(&mut self, states: I) -> BTreeSet<StateId> {
        let mut out = BTreeSet::new();
        for s in states {
            out.extend(self.state_closure(s).iter().copied());
        }
        out
    }

    fn move_and_closure(&mut self, from: &[StateId], symbol: char) -> BTreeSet<StateId> {
        let moved: BTreeSet<StateId> = from
            .iter()
            .flat_map(|&s| self.nfa.state(s).targets(Some(symbol)).iter().copied())
            .collect();
        self.closure(moved)
    }

    /// Earliest-defined rule wins among the accepting members.
    fn resolve_token(&self, config: &BTreeSet<StateId>) -> Option<TokenIndex> {
        config
            .iter()
            .filter_map(|&s| self.nfa.state(s).token)
            .min()
    }

    fn intern(&mut self, config: BTreeSet<StateId>) -> (StateId, bool) {
        let signature: Signature = config.iter().copied().collect();
        if let Some(&index) = self.interner.get(&signature) {
            return (index, false);
        }
        let index = (self.states.len() + 1) as StateId;
        let token = self.resolve_token(&config);
        self.states.push(DfaState {
            index,
            token,
            signature: signature.clone(),
            edges: Vec::new(),
        });
        self.interner.insert(signature, index);
        (index, true)
    }
}
