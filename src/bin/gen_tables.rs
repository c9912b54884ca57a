// src/bin/gen_tables.rs
// Build the demo grammar's tables once and dump them.
// Usage:
//   cargo run --bin gen_tables                     # writes tables/lexer_tables.json
//   cargo run --bin gen_tables -- /path/out.bin    # compact binary
//   cargo run --bin gen_tables -- out.json dense   # dense column layout

use std::{env, fs, path::Path};

use anyhow::{Context, Result};
use munch::{
    dev::grammar::demo_rules_with,
    lexer::{
        BuildOptions, ColumnLayout, Lexer,
        tables::{load_tables_bin_bytes, load_tables_json_bytes, save_tables_bin, save_tables_json},
    },
};

fn main() -> Result<()> {
    env_logger::init();

    let out = env::args()
        .nth(1)
        .unwrap_or_else(|| "tables/lexer_tables.json".to_string());
    let out_path = Path::new(&out);
    let layout = match env::args().nth(2) {
        Some(s) => s.parse::<ColumnLayout>().map_err(anyhow::Error::msg)?,
        None => ColumnLayout::default(),
    };

    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    println!("[gen_tables] building demo grammar tables ({layout} layout)…");
    let lexer = Lexer::compile(&demo_rules_with(BuildOptions { layout }));
    let t = lexer.tables();

    let cells = t.transitions.len() as u64;
    let live = t.transitions.iter().filter(|&&s| s != 0).count();
    let accepting = t.accept.iter().filter(|&&k| k != munch::lexer::tables::NO_TOKEN).count();
    println!(
        "[gen_tables] states = {}, width = {}, cells = {} (~{} KiB), non-dead = {}, accepting = {}",
        t.state_count(),
        t.width,
        cells,
        cells * 4 / 1024,
        live,
        accepting
    );

    let binary = out_path.extension().and_then(|e| e.to_str()) == Some("bin");
    if binary {
        save_tables_bin(out_path, t)
    } else {
        save_tables_json(out_path, t)
    }
    .with_context(|| format!("failed to write {}", out_path.display()))?;

    // read back to catch format drift early
    let bytes = fs::read(out_path)?;
    let reloaded = if binary {
        load_tables_bin_bytes(&bytes)?
    } else {
        load_tables_json_bytes(&bytes)?
    };
    anyhow::ensure!(&reloaded == t, "reloaded tables differ from the built ones");

    println!("[gen_tables] wrote {}", out_path.display());
    Ok(())
}
