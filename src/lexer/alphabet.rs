// src/lexer/alphabet.rs
// Symbol universes used to evaluate predicate classes.

/// A finite universe of input symbols with a dense index.
pub trait Alphabet: Sync {
    /// Every symbol, ascending.
    fn symbols(&self) -> Vec<char>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dense index of `c`, or `None` if `c` is outside the alphabet.
    fn index_of(&self, c: char) -> Option<usize>;
}

/// 7-bit ASCII, U+0000..=U+007F.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ascii;

impl Alphabet for Ascii {
    fn symbols(&self) -> Vec<char> {
        (0u8..=0x7F).map(char::from).collect()
    }

    fn len(&self) -> usize {
        128
    }

    fn index_of(&self, c: char) -> Option<usize> {
        c.is_ascii().then_some(c as usize)
    }
}

/// Basic Multilingual Plane without the surrogate block.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bmp;

const SURROGATES: usize = 0xE000 - 0xD800;

impl Alphabet for Bmp {
    fn symbols(&self) -> Vec<char> {
        (0u32..=0xFFFF).filter_map(char::from_u32).collect()
    }

    fn len(&self) -> usize {
        0x1_0000 - SURROGATES
    }

    fn index_of(&self, c: char) -> Option<usize> {
        let cp = c as usize;
        match cp {
            0..=0xD7FF => Some(cp),
            0xE000..=0xFFFF => Some(cp - SURROGATES),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_match_symbol_lists() {
        assert_eq!(Ascii.symbols().len(), Ascii.len());
        assert_eq!(Bmp.symbols().len(), Bmp.len());
    }

    #[test]
    fn bmp_index_skips_surrogates() {
        assert_eq!(Bmp.index_of('\u{D7FF}'), Some(0xD7FF));
        assert_eq!(Bmp.index_of('\u{E000}'), Some(0xD800));
        assert_eq!(Bmp.index_of('\u{FFFF}'), Some(Bmp.len() - 1));
        assert_eq!(Bmp.index_of('\u{1F600}'), None);
        assert_eq!(Ascii.index_of('é'), None);
        assert_eq!(Ascii.index_of('A'), Some(65));
    }
}
