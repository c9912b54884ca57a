// src/lexer/nfa.rs
// Arena NFA with epsilon edges, built from `Regex` by Thompson's construction.

use std::{collections::BTreeMap, fmt};

use super::{regex::Regex, tables::tokens::TokenIndex};

pub type StateId = u32;

/// Edge label; `None` is epsilon.
pub type Label = Option<char>;

#[derive(Debug, Clone, Default)]
pub struct NfaState {
    pub token: Option<TokenIndex>,
    // BTreeMap keeps label order stable so two builds number DFA states alike.
    edges: BTreeMap<Label, Vec<StateId>>,
}

impl NfaState {
    pub fn targets(&self, label: Label) -> &[StateId] {
        self.edges.get(&label).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn epsilon_targets(&self) -> &[StateId] {
        self.targets(None)
    }

    /// Symbols with an explicit (non-epsilon) edge, ascending.
    pub fn symbols(&self) -> impl Iterator<Item = char> + '_ {
        self.edges.keys().filter_map(|l| *l)
    }

    pub fn edges(&self) -> impl Iterator<Item = (Label, StateId)> + '_ {
        self.edges
            .iter()
            .flat_map(|(l, ts)| ts.iter().map(move |t| (*l, *t)))
    }
}

/// Entry and exit of a sub-automaton inside an `Nfa` arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    pub init: StateId,
    pub tail: StateId,
}

#[derive(Debug, Clone)]
pub struct Nfa {
    states: Vec<NfaState>,
    init: StateId,
    tail: StateId,
}

impl Nfa {
    /// A model holding only a fresh init/tail pair (no edge between them).
    pub fn new() -> Self {
        let mut nfa = Nfa {
            states: Vec::new(),
            init: 0,
            tail: 0,
        };
        nfa.init = nfa.add_state();
        nfa.tail = nfa.add_state();
        nfa
    }

    pub fn from_regex(re: &Regex) -> Self {
        let mut nfa = Nfa {
            states: Vec::new(),
            init: 0,
            tail: 0,
        };
        let frag = nfa.convert(re);
        nfa.init = frag.init;
        nfa.tail = frag.tail;
        nfa
    }

    pub fn init(&self) -> StateId {
        self.init
    }

    pub fn tail(&self) -> StateId {
        self.tail
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn state(&self, id: StateId) -> &NfaState {
        &self.states[id as usize]
    }

    pub fn states(&self) -> &[NfaState] {
        &self.states
    }

    pub fn add_state(&mut self) -> StateId {
        self.states.push(NfaState::default());
        (self.states.len() - 1) as StateId
    }

    pub fn add_edge(&mut self, from: StateId, label: Label, to: StateId) {
        assert!((to as usize) < self.states.len(), "edge target {to} out of range");
        self.states[from as usize]
            .edges
            .entry(label)
            .or_default()
            .push(to);
    }

    pub fn epsilon(&mut self, from: StateId, to: StateId) {
        self.add_edge(from, None, to);
    }

    pub fn set_token(&mut self, id: StateId, token: Option<TokenIndex>) {
        self.states[id as usize].token = token;
    }

    /// Copies every state of `other` into this arena and returns `other`'s
    /// init/tail renumbered into this model.
    pub fn absorb(&mut self, other: &Nfa) -> Fragment {
        let offset = self.states.len() as StateId;
        self.states.extend(other.states.iter().map(|s| NfaState {
            token: s.token,
            edges: s
                .edges
                .iter()
                .map(|(l, ts)| (*l, ts.iter().map(|t| t + offset).collect()))
                .collect(),
        }));
        Fragment {
            init: other.init + offset,
            tail: other.tail + offset,
        }
    }

    /// Merges several models behind one synthetic init/tail pair.
    pub fn union<'a, I: IntoIterator<Item = &'a Nfa>>(models: I) -> Self {
        let mut merged = Nfa::new();
        let (init, tail) = (merged.init, merged.tail);
        for model in models {
            let frag = merged.absorb(model);
            merged.epsilon(init, frag.init);
            merged.epsilon(frag.tail, tail);
        }
        merged
    }

    fn convert(&mut self, re: &Regex) -> Fragment {
        match re {
            Regex::Char(c) => {
                let (init, tail) = (self.add_state(), self.add_state());
                self.add_edge(init, Some(*c), tail);
                Fragment { init, tail }
            }
            Regex::Empty => {
                let (init, tail) = (self.add_state(), self.add_state());
                self.epsilon(init, tail);
                Fragment { init, tail }
            }
            Regex::CharSet(_) | Regex::Range(..) => {
                let members = re.class_members().unwrap_or_default();
                self.convert_class(&members)
            }
            Regex::Literal(chars) => {
                let (init, tail) = (self.add_state(), self.add_state());
                let mut last = init;
                for c in chars {
                    let next = self.add_state();
                    self.add_edge(last, Some(*c), next);
                    last = next;
                }
                self.epsilon(last, tail);
                Fragment { init, tail }
            }
            Regex::Concat(l, r) => {
                let left = self.convert(l);
                let right = self.convert(r);
                self.epsilon(left.tail, right.init);
                Fragment {
                    init: left.init,
                    tail: right.tail,
                }
            }
            Regex::Alt(l, r) => {
                let left = self.convert(l);
                let right = self.convert(r);
                let (init, tail) = (self.add_state(), self.add_state());
                self.epsilon(init, left.init);
                self.epsilon(init, right.init);
                self.epsilon(left.tail, tail);
                self.epsilon(right.tail, tail);
                Fragment { init, tail }
            }
            Regex::Star(inner) => {
                let body = self.convert(inner);
                let (init, tail) = (self.add_state(), self.add_state());
                self.epsilon(init, tail);
                self.epsilon(tail, init);
                self.epsilon(init, body.init);
                self.epsilon(body.tail, tail);
                Fragment { init, tail }
            }
        }
    }

    // All members share one intermediate state. A state per member would give
    // every member its own configuration and DFA state.
    fn convert_class(&mut self, members: &[char]) -> Fragment {
        let (init, tail) = (self.add_state(), self.add_state());
        let mid = self.add_state();
        for c in members {
            self.add_edge(init, Some(*c), mid);
        }
        self.epsilon(mid, tail);
        Fragment { init, tail }
    }
}

impl Default for Nfa {
    fn default() -> Self {
        Nfa::new()
    }
}

impl fmt::Display for Nfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "States: {} (init {}, tail {})", self.len(), self.init, self.tail)?;
        for (index, state) in self.states.iter().enumerate() {
            if let Some(t) = state.token {
                writeln!(f, "{index} = token {t}")?;
            }
        }
        for (from, state) in self.states.iter().enumerate() {
            for (label, to) in state.edges() {
                match label {
                    Some(c) => writeln!(f, "{from} -> {to} ({c:?})")?,
                    None => writeln!(f, "{from} -> {to}")?,
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reachable_by(nfa: &Nfa, text: &str) -> bool {
        fn closure(nfa: &Nfa, set: &mut Vec<StateId>) {
            let mut work = set.clone();
            while let Some(s) = work.pop() {
                for &t in nfa.state(s).epsilon_targets() {
                    if !set.contains(&t) {
                        set.push(t);
                        work.push(t);
                    }
                }
            }
        }
        let mut current = vec![nfa.init()];
        closure(nfa, &mut current);
        for c in text.chars() {
            let mut next: Vec<StateId> = Vec::new();
            for &s in &current {
                for &t in nfa.state(s).targets(Some(c)) {
                    if !next.contains(&t) {
                        next.push(t);
                    }
                }
            }
            closure(nfa, &mut next);
            current = next;
        }
        current.contains(&nfa.tail())
    }

    #[test]
    fn char_fragment_is_one_edge() {
        let nfa = Nfa::from_regex(&Regex::char('x'));
        assert_eq!(nfa.len(), 2);
        assert_eq!(nfa.state(nfa.init()).targets(Some('x')), &[nfa.tail()]);
    }

    #[test]
    fn literal_is_a_chain() {
        let nfa = Nfa::from_regex(&Regex::literal("abc"));
        // init, tail and one state per char
        assert_eq!(nfa.len(), 5);
        assert!(reachable_by(&nfa, "abc"));
        assert!(!reachable_by(&nfa, "ab"));
        assert!(!reachable_by(&nfa, "abcc"));
    }

    #[test]
    fn class_members_share_intermediate() {
        let nfa = Nfa::from_regex(&Regex::range('a', 'c'));
        let init = nfa.state(nfa.init());
        let mids: Vec<_> = init.edges().map(|(_, t)| t).collect();
        assert_eq!(mids.len(), 3);
        assert!(mids.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(init.symbols().collect::<Vec<_>>(), vec!['a', 'b', 'c']);
    }

    #[test]
    fn thompson_operators() {
        let re = (Regex::char('a') | Regex::literal("bc")).any_times() + Regex::char('d');
        let nfa = Nfa::from_regex(&re);
        for ok in ["d", "ad", "bcd", "abcaad"] {
            assert!(reachable_by(&nfa, ok), "{ok}");
        }
        for bad in ["", "a", "bd", "dd"] {
            assert!(!reachable_by(&nfa, bad), "{bad}");
        }
        assert!(reachable_by(&Nfa::from_regex(&Regex::empty()), ""));
    }

    #[test]
    fn absorb_renumbers_and_union_links() {
        let a = Nfa::from_regex(&Regex::char('a'));
        let b = Nfa::from_regex(&Regex::char('b'));
        let merged = Nfa::union([&a, &b]);
        assert_eq!(merged.len(), 2 + a.len() + b.len());
        let starts = merged.state(merged.init()).epsilon_targets();
        assert_eq!(starts, &[2, 4]);
        assert!(reachable_by(&merged, "a"));
        assert!(reachable_by(&merged, "b"));
        assert!(!reachable_by(&merged, "ab"));
    }
}
