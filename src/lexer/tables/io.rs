// src/lexer/tables/io.rs
use std::{
    io::{BufWriter, Write},
    path::Path,
    time::Instant,
};

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use thiserror::Error;

use super::{ColumnLayout, DfaTables};

#[derive(Debug, Error)]
pub enum TablesError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tables JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("bad magic in tables .bin")]
    BadMagic,
    #[error("truncated {0}")]
    Truncated(&'static str),
    #[error("invalid tables: {0}")]
    Invalid(String),
}

// -------------------- JSON (de)serialization --------------------

#[serde_as]
#[derive(Serialize, Deserialize)]
struct TablesDisk {
    #[serde_as(as = "DisplayFromStr")]
    layout: ColumnLayout,
    alphabet: String,
    width: u32,
    transitions: Vec<u32>,
    accept: Vec<u32>,
}

impl From<&DfaTables> for TablesDisk {
    fn from(t: &DfaTables) -> Self {
        Self {
            layout: t.layout,
            alphabet: t.alphabet.iter().collect(),
            width: t.width,
            transitions: t.transitions.clone(),
            accept: t.accept.clone(),
        }
    }
}

impl TablesDisk {
    fn into_tables(self) -> DfaTables {
        DfaTables {
            layout: self.layout,
            alphabet: self.alphabet.chars().collect(),
            width: self.width,
            transitions: self.transitions,
            accept: self.accept,
        }
    }
}

pub fn save_tables_json(path: &Path, t: &DfaTables) -> Result<(), TablesError> {
    // Stream to disk to avoid giant intermediate strings.
    let f = std::fs::File::create(path)?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer(&mut w, &TablesDisk::from(t))?;
    w.flush()?;
    Ok(())
}

pub fn load_tables_json_bytes(data: &[u8]) -> Result<DfaTables, TablesError> {
    let t = serde_json::from_slice::<TablesDisk>(data)?.into_tables();
    t.validate()?;
    Ok(t)
}

// -------------------- Compact binary (little-endian u32) --------------------
//   magic: 8 bytes = "MUNCHT01"
//   u32: rows (dead row included)
//   u32: width
//   u32: layout (0 = raw, 1 = dense)
//   u32: alphabet length, then that many code points
//   u32: transitions[rows * width]
//   u32: accept[rows]

const BIN_MAGIC: &[u8; 8] = b"MUNCHT01";

fn layout_tag(layout: ColumnLayout) -> u32 {
    match layout {
        ColumnLayout::Raw => 0,
        ColumnLayout::Dense => 1,
    }
}

pub fn write_tables_bin<W: Write>(w: &mut W, t: &DfaTables) -> Result<(), TablesError> {
    w.write_all(BIN_MAGIC)?;
    w.write_all(&(t.state_count() as u32).to_le_bytes())?;
    w.write_all(&t.width.to_le_bytes())?;
    w.write_all(&layout_tag(t.layout).to_le_bytes())?;
    w.write_all(&(t.alphabet.len() as u32).to_le_bytes())?;
    for &c in &t.alphabet {
        w.write_all(&(c as u32).to_le_bytes())?;
    }

    // stream in chunks to keep syscalls down on wide raw tables
    const CHUNK: usize = 1 << 16;
    let mut bytes = Vec::with_capacity(CHUNK * 4);
    for chunk in t.transitions.chunks(CHUNK).chain(t.accept.chunks(CHUNK)) {
        bytes.clear();
        for v in chunk {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        w.write_all(&bytes)?;
    }
    Ok(())
}

pub fn save_tables_bin(path: &Path, t: &DfaTables) -> Result<(), TablesError> {
    let instant = Instant::now();
    let f = std::fs::File::create(path)?;
    let mut w = BufWriter::new(f);
    write_tables_bin(&mut w, t)?;
    w.flush()?;
    log::info!(
        "Saved tables to {} in {} ms",
        path.display(),
        instant.elapsed().as_millis()
    );
    Ok(())
}

#[inline]
fn take_u32(buf: &mut &[u8], what: &'static str) -> Result<u32, TablesError> {
    if buf.len() < 4 {
        return Err(TablesError::Truncated(what));
    }
    let mut le = [0u8; 4];
    le.copy_from_slice(&buf[..4]);
    *buf = &buf[4..];
    Ok(u32::from_le_bytes(le))
}

fn take_u32s(buf: &mut &[u8], n: usize, what: &'static str) -> Result<Vec<u32>, TablesError> {
    let bytes = n.checked_mul(4).ok_or(TablesError::Truncated(what))?;
    if buf.len() < bytes {
        return Err(TablesError::Truncated(what));
    }
    let (head, rest) = buf.split_at(bytes);
    *buf = rest;
    Ok(head
        .chunks_exact(4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

pub fn load_tables_bin_bytes(mut data: &[u8]) -> Result<DfaTables, TablesError> {
    if data.len() < BIN_MAGIC.len() {
        return Err(TablesError::Truncated("magic"));
    }
    if &data[..BIN_MAGIC.len()] != BIN_MAGIC {
        return Err(TablesError::BadMagic);
    }
    data = &data[BIN_MAGIC.len()..];

    let rows = take_u32(&mut data, "row count")? as usize;
    let width = take_u32(&mut data, "width")?;
    let layout = match take_u32(&mut data, "layout")? {
        0 => ColumnLayout::Raw,
        1 => ColumnLayout::Dense,
        tag => return Err(TablesError::Invalid(format!("unknown layout tag {tag}"))),
    };

    let alphabet_len = take_u32(&mut data, "alphabet length")? as usize;
    let alphabet = take_u32s(&mut data, alphabet_len, "alphabet")?
        .into_iter()
        .map(|cp| {
            char::from_u32(cp)
                .ok_or_else(|| TablesError::Invalid(format!("code point {cp:#x} is not a char")))
        })
        .collect::<Result<Vec<char>, _>>()?;

    let cells = rows
        .checked_mul(width as usize)
        .ok_or_else(|| TablesError::Invalid("rows*width overflow".into()))?;
    let transitions = take_u32s(&mut data, cells, "transitions")?;
    let accept = take_u32s(&mut data, rows, "accept table")?;

    let t = DfaTables {
        layout,
        alphabet,
        width,
        transitions,
        accept,
    };
    t.validate()?;
    Ok(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{
        nfa::Nfa,
        regex::Regex,
        tables::{BuildOptions, NO_TOKEN, build_tables},
    };

    fn sample(layout: ColumnLayout) -> DfaTables {
        let mut nfa = Nfa::from_regex(&(Regex::literal("ab") | Regex::char('é').at_least_once()));
        let tail = nfa.tail();
        nfa.set_token(tail, Some(3));
        build_tables(&nfa, &BuildOptions { layout })
    }

    #[test]
    fn json_reloads_identically() {
        let t = sample(ColumnLayout::Dense);
        let json = serde_json::to_vec(&TablesDisk::from(&t)).unwrap();
        assert_eq!(load_tables_json_bytes(&json).unwrap(), t);
    }

    #[test]
    fn bin_reloads_identically() {
        let t = sample(ColumnLayout::Raw);
        let mut bytes = Vec::new();
        write_tables_bin(&mut bytes, &t).unwrap();
        assert_eq!(load_tables_bin_bytes(&bytes).unwrap(), t);
    }

    #[test]
    fn bin_rejects_bad_input() {
        let t = sample(ColumnLayout::Dense);
        let mut bytes = Vec::new();
        write_tables_bin(&mut bytes, &t).unwrap();

        let mut wrong = bytes.clone();
        wrong[0] = b'X';
        assert!(matches!(load_tables_bin_bytes(&wrong), Err(TablesError::BadMagic)));

        let short = &bytes[..bytes.len() - 2];
        assert!(matches!(
            load_tables_bin_bytes(short),
            Err(TablesError::Truncated("accept table"))
        ));
    }

    #[test]
    fn json_rejects_dead_state_that_accepts() {
        let mut t = sample(ColumnLayout::Dense);
        assert_eq!(t.accept[0], NO_TOKEN);
        t.accept[0] = 3;
        let json = serde_json::to_vec(&TablesDisk::from(&t)).unwrap();
        assert!(matches!(
            load_tables_json_bytes(&json),
            Err(TablesError::Invalid(_))
        ));
    }
}
