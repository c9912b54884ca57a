//! Negative lexer tests: inputs the rules cannot cover must end the stream
//! with `UnmatchedToken`.

use munch::{
    dev::grammar::demo_lexer,
    lexer::{Lexer, Position, Regex, RuleSet, ScanError},
};

fn digits_only() -> Lexer {
    let mut rs = RuleSet::new();
    rs.define("DIGIT", Regex::range('0', '9'));
    Lexer::compile(&rs)
}

fn unmatched(err: ScanError) -> (String, Position, Option<char>) {
    let ScanError::UnmatchedToken { text, start, found } = err;
    (text, start, found)
}

#[test]
fn letter_after_digit() {
    let lx = digits_only();
    let mut scan = lx.scan(munch::lexer::StrReader::new("5a"));
    let first = scan.next().unwrap().unwrap();
    assert_eq!((&*first.name, first.text.as_str()), ("DIGIT", "5"));
    let (text, start, found) = unmatched(scan.next().unwrap().unwrap_err());
    assert_eq!(text, "a");
    assert_eq!(start.offset, 1);
    assert_eq!(found, Some('a'));
    assert!(scan.next().is_none(), "stream must end after an error");
}

#[test]
fn unterminated_string_eof() {
    let src = "s=\"hello"; // missing closing quote
    let (text, start, found) = unmatched(demo_lexer().tokenize(src).unwrap_err());
    assert_eq!(text, "\"hello");
    assert_eq!(start.column, 3);
    assert_eq!(found, None, "end of input killed the automaton");
}

#[test]
fn newline_in_string() {
    let src = "s=\"hello\nworld\""; // newline inside string not allowed
    let (text, _, found) = unmatched(demo_lexer().tokenize(src).unwrap_err());
    assert_eq!(text, "\"hello");
    assert_eq!(found, Some('\n'));
}

#[test]
fn lone_bang() {
    // only "!=" is a token
    let (text, start, found) = unmatched(demo_lexer().tokenize("a !b").unwrap_err());
    assert_eq!(text, "!");
    assert_eq!(start, Position { offset: 2, line: 1, column: 3 });
    assert_eq!(found, Some('b'));
}

#[test]
fn non_ascii_symbol() {
    let (text, start, found) = unmatched(demo_lexer().tokenize("x = 1;\n  é").unwrap_err());
    assert_eq!(text, "é");
    assert_eq!((start.line, start.column), (2, 3));
    assert_eq!(found, Some('é'));
}

#[test]
fn nul_is_a_symbol_not_end_of_input() {
    let (text, _, found) = unmatched(demo_lexer().tokenize("ab\0").unwrap_err());
    assert_eq!(text, "\0");
    assert_eq!(found, Some('\0'));
}
