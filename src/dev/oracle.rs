// src/dev/oracle.rs
// Reference tokenizer that never builds an automaton: it steps every rule's
// regex by Brzozowski derivatives. Slow, but independent of the NFA/DFA code,
// which makes it a useful cross-check for the table-driven scanner.

use std::sync::Arc;

use crate::lexer::{Position, Regex, RuleSet, ScanError, Token, TokenIndex};

/// True when `re` matches no string at all.
pub fn is_void(re: &Regex) -> bool {
    match re {
        Regex::Char(_) | Regex::Empty | Regex::Literal(_) | Regex::Star(_) => false,
        Regex::CharSet(set) => set.is_empty(),
        Regex::Range(lo, hi) => lo > hi,
        Regex::Concat(l, r) => is_void(l) || is_void(r),
        Regex::Alt(l, r) => is_void(l) && is_void(r),
    }
}

/// True when `re` matches the empty string.
pub fn nullable(re: &Regex) -> bool {
    match re {
        Regex::Empty | Regex::Star(_) => true,
        Regex::Char(_) | Regex::CharSet(_) | Regex::Range(..) => false,
        Regex::Literal(chars) => chars.is_empty(),
        Regex::Concat(l, r) => nullable(l) && nullable(r),
        Regex::Alt(l, r) => nullable(l) || nullable(r),
    }
}

fn void() -> Regex {
    Regex::CharSet(Default::default())
}

fn concat(l: Regex, r: Regex) -> Regex {
    if is_void(&l) || is_void(&r) {
        void()
    } else if l == Regex::Empty {
        r
    } else if r == Regex::Empty {
        l
    } else {
        l.concat(r)
    }
}

fn alt(l: Regex, r: Regex) -> Regex {
    if is_void(&l) {
        r
    } else if is_void(&r) || l == r {
        l
    } else {
        l.union(r)
    }
}

fn hit(yes: bool) -> Regex {
    if yes { Regex::Empty } else { void() }
}

/// The language of strings `w` such that `c w` is matched by `re`.
pub fn derive(re: &Regex, c: char) -> Regex {
    match re {
        Regex::Empty => void(),
        Regex::Char(x) => hit(*x == c),
        Regex::CharSet(set) => hit(set.contains(&c)),
        Regex::Range(lo, hi) => hit(*lo <= c && c <= *hi),
        Regex::Literal(chars) => match chars.split_first() {
            Some((&first, rest)) if first == c => {
                if rest.is_empty() {
                    Regex::Empty
                } else {
                    Regex::Literal(rest.to_vec())
                }
            }
            _ => void(),
        },
        Regex::Concat(l, r) => {
            let head = concat(derive(l, c), (**r).clone());
            if nullable(l) {
                alt(head, derive(r, c))
            } else {
                head
            }
        }
        Regex::Alt(l, r) => alt(derive(l, c), derive(r, c)),
        Regex::Star(inner) => concat(derive(inner, c), re.clone()),
    }
}

/// Whole-string membership.
pub fn matches(re: &Regex, text: &str) -> bool {
    let mut cur = re.clone();
    for c in text.chars() {
        cur = derive(&cur, c);
        if is_void(&cur) {
            return false;
        }
    }
    nullable(&cur)
}

/// Scans `input` the way the table-driven scanner does: extend
/// the lexeme while any rule can still match a continuation, then classify
/// exactly that lexeme by the lowest nullable rule.
///
/// Agrees with `Lexer` for rule sets without empty character classes; an
/// empty class keeps NFA states alive that no derivative can represent.
pub fn reference_tokenize(rules: &RuleSet, input: &str) -> Result<Vec<Token>, ScanError> {
    let chars: Vec<char> = input.chars().collect();
    let names: Vec<Arc<str>> = rules.rules().iter().map(|r| r.name.clone()).collect();
    let mut out = Vec::new();
    let mut pos = 0usize;
    let mut at = Position::START;

    while pos < chars.len() {
        let mut live: Vec<Regex> = rules.rules().iter().map(|r| r.regex.clone()).collect();
        let mut end = pos;
        while end < chars.len() {
            let next: Vec<Regex> = live.iter().map(|re| derive(re, chars[end])).collect();
            if next.iter().all(is_void) {
                break;
            }
            live = next;
            end += 1;
        }

        let found = chars.get(end).copied();
        if end == pos {
            return Err(ScanError::UnmatchedToken {
                text: chars[pos].to_string(),
                start: at,
                found,
            });
        }

        let text: String = chars[pos..end].iter().collect();
        let Some(index) = live.iter().position(nullable) else {
            return Err(ScanError::UnmatchedToken {
                text,
                start: at,
                found,
            });
        };
        let index = index as TokenIndex;
        out.push(Token {
            index,
            name: names[index as usize].clone(),
            text,
            start: at,
        });

        for &c in &chars[pos..end] {
            at.offset += 1;
            if c == '\n' {
                at.line += 1;
                at.column = 1;
            } else {
                at.column += 1;
            }
        }
        pos = end;
    }
    Ok(out)
}
