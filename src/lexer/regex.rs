// src/lexer/regex.rs
// Algebraic regular expressions over `char`. Trees are immutable once built.

use std::{
    collections::BTreeSet,
    fmt,
    ops::{Add, BitOr},
};

use rayon::prelude::*;

use super::alphabet::Alphabet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Regex {
    Char(char),
    /// Matches the empty string.
    Empty,
    CharSet(BTreeSet<char>),
    /// Inclusive range; `lo > hi` is the empty set.
    Range(char, char),
    Literal(Vec<char>),
    Concat(Box<Regex>, Box<Regex>),
    Alt(Box<Regex>, Box<Regex>),
    Star(Box<Regex>),
}

impl Regex {
    pub fn char(c: char) -> Self {
        Regex::Char(c)
    }

    pub fn empty() -> Self {
        Regex::Empty
    }

    pub fn chars<I: IntoIterator<Item = char>>(chars: I) -> Self {
        Regex::CharSet(chars.into_iter().collect())
    }

    pub fn range(lo: char, hi: char) -> Self {
        Regex::Range(lo, hi)
    }

    pub fn literal(text: &str) -> Self {
        Regex::Literal(text.chars().collect())
    }

    /// Evaluates `pred` over every symbol of `alphabet` right away and keeps
    /// the accepted ones as a `CharSet`. Cost is O(|alphabet|) per call.
    pub fn predicate<A, F>(alphabet: &A, pred: F) -> Self
    where
        A: Alphabet + ?Sized,
        F: Fn(char) -> bool + Sync,
    {
        let accepted: Vec<char> = alphabet
            .symbols()
            .into_par_iter()
            .filter(|&c| pred(c))
            .collect();
        Regex::CharSet(accepted.into_iter().collect())
    }

    pub fn concat(self, other: Regex) -> Self {
        Regex::Concat(Box::new(self), Box::new(other))
    }

    pub fn union(self, other: Regex) -> Self {
        Regex::Alt(Box::new(self), Box::new(other))
    }

    /// Kleene star.
    pub fn any_times(self) -> Self {
        Regex::Star(Box::new(self))
    }

    pub fn at_least_once(self) -> Self {
        self.clone().concat(self.any_times())
    }

    /// Members of a character class node (`CharSet` or `Range`), ascending.
    pub(crate) fn class_members(&self) -> Option<Vec<char>> {
        match self {
            Regex::CharSet(set) => Some(set.iter().copied().collect()),
            Regex::Range(lo, hi) => Some((*lo..=*hi).collect()),
            _ => None,
        }
    }
}

impl Add for Regex {
    type Output = Regex;

    fn add(self, rhs: Regex) -> Regex {
        self.concat(rhs)
    }
}

impl BitOr for Regex {
    type Output = Regex;

    fn bitor(self, rhs: Regex) -> Regex {
        self.union(rhs)
    }
}

impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Regex::Char(c) => write!(f, "{}", c.escape_debug()),
            Regex::Empty => f.write_str("ε"),
            Regex::CharSet(set) => {
                f.write_str("(")?;
                for (i, c) in set.iter().enumerate() {
                    if i != 0 {
                        f.write_str("|")?;
                    }
                    write!(f, "{}", c.escape_debug())?;
                }
                f.write_str(")")
            }
            Regex::Range(lo, hi) => write!(f, "[{}-{}]", lo.escape_debug(), hi.escape_debug()),
            Regex::Literal(chars) => {
                f.write_str("\"")?;
                for c in chars {
                    write!(f, "{}", c.escape_debug())?;
                }
                f.write_str("\"")
            }
            Regex::Concat(l, r) => write!(f, "(({l})({r}))"),
            Regex::Alt(l, r) => write!(f, "({l}|{r})"),
            Regex::Star(inner) => write!(f, "({inner})*"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::alphabet::{Ascii, Bmp};

    #[test]
    fn renders_canonical_text() {
        let id = (Regex::range('a', 'z') | Regex::char('_'))
            + (Regex::range('a', 'z') | Regex::range('0', '9')).any_times();
        assert_eq!(id.to_string(), "((([a-z]|_))((([a-z]|[0-9]))*))");
        assert_eq!(Regex::literal("if").to_string(), "\"if\"");
        assert_eq!(Regex::chars(['b', 'a']).to_string(), "(a|b)");
        assert_eq!(Regex::empty().to_string(), "ε");
        assert_eq!(Regex::char('\n').to_string(), "\\n");
    }

    #[test]
    fn at_least_once_is_concat_with_star() {
        let a = Regex::char('a');
        assert_eq!(
            a.clone().at_least_once(),
            Regex::Concat(Box::new(a.clone()), Box::new(Regex::Star(Box::new(a))))
        );
    }

    #[test]
    fn predicate_degenerates_to_charset() {
        let digits = Regex::predicate(&Ascii, |c| c.is_ascii_digit());
        assert_eq!(digits, Regex::chars('0'..='9'));
        let none = Regex::predicate(&Ascii, |c| c == 'é');
        assert_eq!(none, Regex::CharSet(BTreeSet::new()));
        let wide = Regex::predicate(&Bmp, |c| c == 'é' || c == '\u{FFFD}');
        assert_eq!(wide, Regex::chars(['é', '\u{FFFD}']));
    }

    #[test]
    fn reversed_range_has_no_members() {
        assert_eq!(Regex::range('z', 'a').class_members(), Some(vec![]));
        assert_eq!(Regex::range('a', 'c').class_members(), Some(vec!['a', 'b', 'c']));
    }
}
