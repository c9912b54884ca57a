// src/dev/grammar.rs
// Small C-like token grammar used by the demo CLI, the fuzzer and the tests.

use crate::lexer::{
    BuildOptions, Lexer, Regex, RuleSet,
    alphabet::Ascii,
};

/// Multi-char operators come before their single-char prefixes only for
/// readability; maximal munch picks the longer one either way.
pub const OPERATORS: &[(&str, &str)] = &[
    ("EQEQ", "=="),
    ("NE", "!="),
    ("LE", "<="),
    ("GE", ">="),
    ("ASSIGN", "="),
    ("LT", "<"),
    ("GT", ">"),
    ("PLUS", "+"),
    ("MINUS", "-"),
    ("STAR", "*"),
    ("SLASH", "/"),
    ("LPAREN", "("),
    ("RPAREN", ")"),
    ("LBRACE", "{"),
    ("RBRACE", "}"),
    ("SEMI", ";"),
    ("COMMA", ","),
];

pub const KEYWORDS: &[(&str, &str)] = &[
    ("IF", "if"),
    ("ELSE", "else"),
    ("WHILE", "while"),
    ("RETURN", "return"),
];

pub fn demo_rules() -> RuleSet {
    demo_rules_with(BuildOptions::default())
}

pub fn demo_rules_with(options: BuildOptions) -> RuleSet {
    let mut rules = RuleSet::with_options(options);

    // keywords first so they outrank ID on equal length
    for &(name, text) in KEYWORDS {
        rules.define(name, Regex::literal(text));
    }

    let alpha = Regex::predicate(&Ascii, |c| c.is_ascii_alphabetic() || c == '_');
    let alnum = Regex::predicate(&Ascii, |c| c.is_ascii_alphanumeric() || c == '_');
    rules.define("ID", alpha + alnum.any_times());
    rules.define("INT", Regex::range('0', '9').at_least_once());

    let string_body = Regex::predicate(&Ascii, |c| {
        (c == ' ' || c.is_ascii_graphic()) && c != '"' && c != '\\'
    });
    rules.define(
        "STRING",
        Regex::char('"') + string_body.any_times() + Regex::char('"'),
    );

    let comment_body = Regex::predicate(&Ascii, |c| c != '\n');
    rules.define("COMMENT", Regex::literal("//") + comment_body.any_times());
    rules.define("WS", Regex::chars([' ', '\t', '\r', '\n']).at_least_once());

    for &(name, text) in OPERATORS {
        rules.define(name, Regex::literal(text));
    }
    rules
}

pub fn demo_lexer() -> Lexer {
    Lexer::compile(&demo_rules())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_grammar_tokenizes_a_statement() {
        let lx = demo_lexer();
        let toks = lx.tokenize("while (x1 >= 10) { s = \"a b\"; } // done").unwrap();
        let names: Vec<&str> = toks
            .iter()
            .filter(|t| &*t.name != "WS")
            .map(|t| &*t.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "WHILE", "LPAREN", "ID", "GE", "INT", "RPAREN", "LBRACE", "ID", "ASSIGN", "STRING",
                "SEMI", "RBRACE", "COMMENT"
            ]
        );
        assert_eq!(toks.last().unwrap().text, "// done");
    }

    #[test]
    fn keyword_prefix_is_an_identifier() {
        let toks = demo_lexer().tokenize("iffy else_ if").unwrap();
        let got: Vec<_> = toks.iter().map(|t| (&*t.name, t.text.as_str())).collect();
        assert_eq!(
            got,
            vec![
                ("ID", "iffy"),
                ("WS", " "),
                ("ID", "else_"),
                ("WS", " "),
                ("IF", "if")
            ]
        );
    }
}
