// src/lexer/rules.rs

use std::sync::Arc;

use super::{
    nfa::Nfa,
    regex::Regex,
    tables::{BuildOptions, TokenIndex},
};

#[derive(Debug, Clone)]
pub struct Rule {
    pub name: Arc<str>,
    pub regex: Regex,
    /// Definition order; lower wins ties.
    pub index: TokenIndex,
}

/// Ordered token rules, each already compiled to a tagged NFA fragment.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
    fragments: Vec<Nfa>,
    options: BuildOptions,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: BuildOptions) -> Self {
        RuleSet {
            options,
            ..Self::default()
        }
    }

    pub fn define(&mut self, name: &str, regex: Regex) -> TokenIndex {
        let index = self.rules.len() as TokenIndex;
        let mut fragment = Nfa::from_regex(&regex);
        let tail = fragment.tail();
        fragment.set_token(tail, Some(index));
        log::trace!("rule {index} {name} = {regex} ({} NFA states)", fragment.len());

        self.fragments.push(fragment);
        self.rules.push(Rule {
            name: name.into(),
            regex,
            index,
        });
        index
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// All fragments behind one synthetic init/tail pair.
    pub fn merged_nfa(&self) -> Nfa {
        Nfa::union(&self.fragments)
    }
}
