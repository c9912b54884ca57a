// src/bin/fuzz_lex.rs
// Generate random-but-valid inputs, run the table scanner and the reference
// oracle, compare.
//   - FUZZ_LEN / FUZZ_ITERS / FUZZ_SEED   generation knobs
//   - FUZZ_SAVE=1 and FUZZ_DIR=...        save generated cases
//   - FUZZ_INPUT=path                     replay a saved case
//   - FUZZ_LAYOUT=raw|dense               column layout of the tables

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    time::{Instant, SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result};
use munch::{
    dev::{generator::gen_valid_source, grammar::demo_rules_with, oracle::reference_tokenize},
    lexer::{BuildOptions, ColumnLayout, Lexer, RuleSet, ScanError, Token},
};
use rand::{SeedableRng, rngs::StdRng};

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn main() -> Result<()> {
    env_logger::init();

    let layout: ColumnLayout = env_or("FUZZ_LAYOUT", ColumnLayout::default());
    let rules = demo_rules_with(BuildOptions { layout });
    let lexer = Lexer::compile(&rules);

    // --- REPLAY A SINGLE CASE ---
    if let Ok(path) = std::env::var("FUZZ_INPUT") {
        eprintln!("[replay] reading {path}");
        let s = fs::read_to_string(&path).with_context(|| format!("failed to read {path}"))?;
        if !run_once(&lexer, &rules, &s, None) {
            std::process::exit(1);
        }
        return Ok(());
    }

    // --- FUZZ MODE ---
    let save_cases = std::env::var("FUZZ_SAVE").ok().as_deref() == Some("1");
    let out_dir = std::env::var("FUZZ_DIR").unwrap_or_else(|_| "fuzz-cases".to_string());
    let len: usize = env_or("FUZZ_LEN", 10_000);
    let iters: usize = env_or("FUZZ_ITERS", 3);
    let seed: u64 = env_or("FUZZ_SEED", 42);

    eprintln!("[fuzz] len={len} iters={iters} seed={seed} layout={layout}");
    let mut rng = StdRng::seed_from_u64(seed);

    if save_cases {
        fs::create_dir_all(&out_dir).with_context(|| format!("failed to create {out_dir}"))?;
    }

    for i in 0..iters {
        let s = gen_valid_source(&mut rng, len);
        eprintln!("[fuzz] iter {i}: generated {} chars", s.len());

        if save_cases {
            let path = save_case(&out_dir, seed, i, &s)?;
            eprintln!("[save] wrote {}", path.display());
        }

        if !run_once(&lexer, &rules, &s, Some(i)) {
            std::process::exit(1);
        }
    }
    eprintln!("[fuzz] all iterations matched ✅");
    Ok(())
}

// ---------- run one (scanner vs oracle) ----------

fn run_once(lexer: &Lexer, rules: &RuleSet, src: &str, iter: Option<usize>) -> bool {
    let t0 = Instant::now();
    let scanned = lexer.tokenize(src);
    let t1 = Instant::now();
    let reference = reference_tokenize(rules, src);
    let t2 = Instant::now();

    let eq = compare_streams(src, &scanned, &reference);
    let label = match iter {
        Some(i) => format!("[fuzz] iter {i}"),
        None => "[replay]".to_string(),
    };
    eprintln!(
        "{label}: scanner {} ms  |  oracle {} ms  |  tokens = {}  -> {}",
        (t1 - t0).as_millis(),
        (t2 - t1).as_millis(),
        scanned.as_ref().map_or(0, Vec::len),
        if eq { "OK" } else { "MISMATCH!" }
    );
    eq
}

// ---------- save / replay helpers ----------

#[derive(serde::Serialize)]
struct CaseMeta<'a> {
    unix_ts: u64,
    seed: u64,
    iter: usize,
    actual_chars: usize,
    note: &'a str,
}

fn save_case(dir: &str, seed: u64, iter: usize, src: &str) -> Result<PathBuf> {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let base = format!("case_s{seed}_i{iter}_n{}.src", src.len());
    let path = Path::new(dir).join(base);
    fs::write(&path, src.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))?;

    let meta = CaseMeta {
        unix_ts: ts,
        seed,
        iter,
        actual_chars: src.chars().count(),
        note: "Replay with: FUZZ_INPUT=<this file> cargo run --bin fuzz_lex",
    };
    let meta_path = path.with_extension("json");
    let mut f = fs::File::create(&meta_path)?;
    writeln!(f, "{}", serde_json::to_string_pretty(&meta)?)?;

    Ok(path)
}

// ---------- comparison ----------

fn compare_streams(
    src: &str,
    scanned: &Result<Vec<Token>, ScanError>,
    reference: &Result<Vec<Token>, ScanError>,
) -> bool {
    match (scanned, reference) {
        (Ok(a), Ok(b)) => {
            let i = first_divergence_idx(a, b);
            if i == a.len() && a.len() == b.len() {
                return true;
            }
            eprintln!(
                "[diff] first divergence at token {i} (scanner={} oracle={})",
                a.len(),
                b.len()
            );
            if let Some(t) = a.get(i).or_else(|| b.get(i)) {
                dump_src_window(src, t.start.offset, t.text.chars().count(), i);
            }
            dump_near(a, b, i.saturating_sub(3));
            false
        }
        (Err(a), Err(b)) if a == b => {
            eprintln!("[diff] both rejected the input identically: {a}");
            // generated sources are always valid
            false
        }
        (a, b) => {
            eprintln!("[diff] outcome mismatch:\n  scanner: {}\n  oracle:  {}", summary(a), summary(b));
            false
        }
    }
}

fn summary(r: &Result<Vec<Token>, ScanError>) -> String {
    match r {
        Ok(toks) => format!("{} tokens", toks.len()),
        Err(e) => e.to_string(),
    }
}

fn first_divergence_idx(a: &[Token], b: &[Token]) -> usize {
    a.iter()
        .zip(b)
        .position(|(x, y)| x != y)
        .unwrap_or(a.len().min(b.len()))
}

fn dump_src_window(src: &str, start: usize, len: usize, idx: usize) {
    let chars: Vec<char> = src.chars().collect();
    let lo = start.saturating_sub(32);
    let hi = (start + len + 32).min(chars.len());
    let snippet: String = chars[lo..hi].iter().collect();

    eprintln!("[src idx={idx}] token @{start}+{len}  window [{lo}..{hi}]");
    eprintln!("    {snippet:?}");
}

fn dump_near(a: &[Token], b: &[Token], from_idx: usize) {
    let hi = (from_idx + 6).min(a.len().max(b.len()));
    eprintln!("--- context tokens [{from_idx}..{hi}) ---");
    for i in from_idx..hi {
        let x = a.get(i).map(|t| (&*t.name, t.start.to_string(), t.text.as_str()));
        let y = b.get(i).map(|t| (&*t.name, t.start.to_string(), t.text.as_str()));
        let mark = if x == y { "✅" } else { "❌" };
        eprintln!("{mark} #{i:06} SCAN={x:?}  ORACLE={y:?}");
    }
}
