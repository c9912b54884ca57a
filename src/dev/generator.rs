// src/dev/generator.rs
// Random sources that the demo grammar always accepts.

use rand::Rng;

use super::grammar::{KEYWORDS, OPERATORS};

/// Produces at least `target_len` chars (0 gives an empty string).
pub fn gen_valid_source<R: Rng>(rng: &mut R, target_len: usize) -> String {
    let mut out = String::with_capacity(target_len + target_len / 8);

    while out.len() < target_len {
        let roll = rng.random_range(0u32..100);

        match roll {
            0..=24 => push_ident(rng, &mut out),         // ~25%
            25..=29 => push_keyword(rng, &mut out),      // ~5%
            30..=41 => push_int(rng, &mut out),          // ~12%
            42..=56 => push_ws(rng, &mut out),           // ~15%
            57..=61 => push_string(rng, &mut out),       // ~5%
            62..=66 => push_line_comment(rng, &mut out), // ~5%
            67..=99 => push_operator(rng, &mut out),     // ~33%
            _ => unreachable!(),
        }
    }
    out
}

fn push_ident<R: Rng>(rng: &mut R, out: &mut String) {
    let len = rng.random_range(1..=12);
    out.push(random_alpha(rng));
    for _ in 1..len {
        if rng.random_bool(0.6) {
            out.push(random_alpha(rng));
        } else {
            out.push(random_digit(rng));
        }
    }
}

fn push_keyword<R: Rng>(rng: &mut R, out: &mut String) {
    let i = rng.random_range(0..KEYWORDS.len());
    out.push_str(KEYWORDS[i].1);
}

fn push_int<R: Rng>(rng: &mut R, out: &mut String) {
    let len = rng.random_range(1..=8);
    for _ in 0..len {
        out.push(random_digit(rng));
    }
}

fn push_ws<R: Rng>(rng: &mut R, out: &mut String) {
    let opts: [char; 4] = [' ', '\t', '\r', '\n'];
    let len = rng.random_range(1..=8);
    for _ in 0..len {
        let i = rng.random_range(0..opts.len());
        out.push(opts[i]);
    }
}

fn push_string<R: Rng>(rng: &mut R, out: &mut String) {
    const BODY: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 +-*/=<>(){};,!'";
    out.push('"');
    let len = rng.random_range(0..=16);
    for _ in 0..len {
        let i = rng.random_range(0..BODY.len());
        out.push(BODY[i] as char);
    }
    out.push('"');
}

fn push_line_comment<R: Rng>(rng: &mut R, out: &mut String) {
    const ALPH: &[u8] =
        b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 +-*/&|![]{}()<>=\"\t";
    out.push_str("//");
    let len = rng.random_range(0..=40);
    for _ in 0..len {
        let i = rng.random_range(0..ALPH.len());
        out.push(ALPH[i] as char);
    }
    out.push('\n');
}

fn push_operator<R: Rng>(rng: &mut R, out: &mut String) {
    let i = rng.random_range(0..OPERATORS.len());
    out.push_str(OPERATORS[i].1);
    if rng.random_bool(0.25) {
        out.push(' ');
    }
}

fn random_alpha<R: Rng>(rng: &mut R) -> char {
    let set = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_";
    let i = rng.random_range(0..set.len());
    set[i] as char
}

fn random_digit<R: Rng>(rng: &mut R) -> char {
    let set = b"0123456789";
    let i = rng.random_range(0..set.len());
    set[i] as char
}
