// src/lexer/tables/build.rs
use std::time::Instant;

use super::{BuildOptions, ColumnLayout, DEAD_STATE, DfaTables, NO_TOKEN, dfa::DfaModel};
use crate::lexer::nfa::Nfa;

/// Runs subset construction over `nfa` and lays the result out as dense tables.
pub fn build_tables(nfa: &Nfa, options: &BuildOptions) -> DfaTables {
    let t0 = Instant::now();
    let model = DfaModel::build(nfa);
    log::debug!(
        "[tables] subset construction: {} NFA states -> {} DFA states, alphabet {} ({:?})",
        nfa.len(),
        model.len(),
        model.alphabet().len(),
        t0.elapsed()
    );

    let t1 = Instant::now();
    let tables = materialize(&model, options.layout);
    log::debug!(
        "[tables] {} rows x {} columns ({} layout, {:?})",
        tables.state_count(),
        tables.width,
        tables.layout,
        t1.elapsed()
    );
    tables
}

pub fn materialize(model: &DfaModel, layout: ColumnLayout) -> DfaTables {
    let alphabet: Vec<char> = model.alphabet().iter().copied().collect();
    if alphabet.is_empty() {
        log::warn!("[tables] no rule consumes any symbol; every input goes straight to the dead state");
    }

    let width = match layout {
        ColumnLayout::Raw => alphabet.last().map_or(0, |&c| c as usize + 1),
        ColumnLayout::Dense => alphabet.len(),
    };
    let rows = model.len() + 1;

    // Row 0 stays all-zero: every unset entry is a move into the dead state.
    let mut transitions = vec![DEAD_STATE; rows * width];
    let mut accept = vec![NO_TOKEN; rows];

    let column = |c: char| -> usize {
        match layout {
            ColumnLayout::Raw => c as usize,
            ColumnLayout::Dense => alphabet
                .binary_search(&c)
                .expect("edge symbol missing from discovered alphabet"),
        }
    };

    // DFS from init; the visited guard keeps cycles finite.
    let mut visited = vec![false; rows];
    let mut stack = vec![model.init().index];
    while let Some(index) = stack.pop() {
        if std::mem::replace(&mut visited[index as usize], true) {
            continue;
        }
        let state = model.state(index);
        accept[index as usize] = state.token.unwrap_or(NO_TOKEN);
        for &(symbol, target) in &state.edges {
            transitions[index as usize * width + column(symbol)] = target;
            stack.push(target);
        }
    }

    DfaTables {
        layout,
        alphabet,
        width: width as u32,
        transitions,
        accept,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{nfa::Nfa, regex::Regex, tables::INIT_STATE};

    fn digits() -> Nfa {
        let mut nfa = Nfa::from_regex(&Regex::range('0', '9').at_least_once());
        let tail = nfa.tail();
        nfa.set_token(tail, Some(0));
        nfa
    }

    #[test]
    fn dead_row_is_a_non_accepting_sink() {
        for layout in [ColumnLayout::Raw, ColumnLayout::Dense] {
            let t = build_tables(&digits(), &BuildOptions { layout });
            assert!(t.row(DEAD_STATE).iter().all(|&s| s == DEAD_STATE));
            assert_eq!(t.accept(DEAD_STATE), None);
            t.validate().unwrap();
        }
    }

    #[test]
    fn raw_width_is_max_symbol_plus_one() {
        let t = build_tables(&digits(), &BuildOptions::default());
        assert_eq!(t.width, '9' as u32 + 1);
        assert_eq!(t.column('5'), Some('5' as usize));
        assert_eq!(t.column('a'), None);
        assert_ne!(t.next(INIT_STATE, '7' as usize), DEAD_STATE);
        assert_eq!(t.next(INIT_STATE, '/' as usize), DEAD_STATE);
    }

    #[test]
    fn dense_width_is_alphabet_size() {
        let t = build_tables(
            &digits(),
            &BuildOptions {
                layout: ColumnLayout::Dense,
            },
        );
        assert_eq!(t.width, 10);
        assert_eq!(t.column('0'), Some(0));
        assert_eq!(t.column('9'), Some(9));
        assert_eq!(t.column('/'), None);
    }

    #[test]
    fn empty_alphabet_degenerates() {
        let mut nfa = Nfa::from_regex(&Regex::empty());
        let tail = nfa.tail();
        nfa.set_token(tail, Some(0));
        let t = build_tables(&nfa, &BuildOptions::default());
        assert_eq!(t.width, 0);
        assert_eq!(t.state_count(), 2);
        assert_eq!(t.accept(INIT_STATE), Some(0));
        assert!(t.transitions.is_empty());
        t.validate().unwrap();
    }

    #[test]
    #[should_panic(expected = "outside table width")]
    fn column_outside_table_panics() {
        let t = build_tables(&digits(), &BuildOptions::default());
        t.next(INIT_STATE, t.width as usize);
    }

    #[test]
    fn construction_is_idempotent() {
        let a = build_tables(&digits(), &BuildOptions::default());
        let b = build_tables(&digits(), &BuildOptions::default());
        assert_eq!(a, b);
    }
}
