// src/main.rs
// Tokenize a file (or stdin) with the demo grammar.
// Usage:
//   cargo run -- path/to/source
//   echo 'x1 y2' | cargo run
//   MUNCH_LAYOUT=dense cargo run -- file    # dense column layout

use std::io::Read;

use anyhow::{Context, Result};
use munch::{
    dev::grammar::demo_rules_with,
    lexer::{BuildOptions, ColumnLayout, Lexer},
};

fn main() -> Result<()> {
    env_logger::init();

    let layout = match std::env::var("MUNCH_LAYOUT") {
        Ok(s) => s
            .parse::<ColumnLayout>()
            .map_err(anyhow::Error::msg)
            .context("MUNCH_LAYOUT")?,
        Err(_) => ColumnLayout::default(),
    };

    let src = match std::env::args().nth(1) {
        Some(path) => {
            std::fs::read_to_string(&path).with_context(|| format!("failed to read {path}"))?
        }
        None => {
            let mut s = String::new();
            std::io::stdin()
                .read_to_string(&mut s)
                .context("failed to read stdin")?;
            s
        }
    };

    let lexer = Lexer::compile(&demo_rules_with(BuildOptions { layout }));
    log::info!(
        "demo grammar: {} rules, {} states, width {}",
        lexer.names().len(),
        lexer.tables().state_count(),
        lexer.tables().width
    );

    for item in lexer.scan(munch::lexer::StrReader::new(&src)) {
        let token = item?;
        println!("{token}");
    }
    Ok(())
}
