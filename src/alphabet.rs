use crate::error::{RbResult, RunebreakError};
use crate::stream::{CipherStream, Mark, MarkKind};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One entry of an alphabet: a symbol index, its canonical glyph, and any
/// alias glyphs accepted by the tokenizer (alternate transliterations,
/// raw rune characters). `weight` is an optional per-symbol numeric value
/// (the runic alphabet associates a prime with each symbol).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Symbol {
    pub index: u8,
    pub glyph: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub weight: Option<f64>,
}

/// An ordered set of N symbols with unambiguous greedy tokenization:
/// longer glyphs are always tried before shorter ones at each position.
#[derive(Debug, Clone)]
pub struct Alphabet {
    symbols: Vec<Symbol>,
    // (glyph as chars, symbol index), sorted longest-first then lexicographic
    lookup: Vec<(Vec<char>, u8)>,
}

impl Alphabet {
    pub fn new(symbols: Vec<Symbol>) -> RbResult<Self> {
        if symbols.len() < 2 {
            return Err(RunebreakError::Config(format!(
                "Alphabet needs at least 2 symbols, got {}",
                symbols.len()
            )));
        }
        if symbols.len() > 255 {
            return Err(RunebreakError::Config(format!(
                "Alphabet is limited to 255 symbols, got {}",
                symbols.len()
            )));
        }

        let mut lookup: Vec<(Vec<char>, u8)> = Vec::new();
        let mut seen: Vec<String> = Vec::new();

        for (i, sym) in symbols.iter().enumerate() {
            if sym.index as usize != i {
                return Err(RunebreakError::Validation(format!(
                    "Symbol '{}' has index {} but sits at position {}",
                    sym.glyph, sym.index, i
                )));
            }
            for glyph in std::iter::once(&sym.glyph).chain(sym.aliases.iter()) {
                if glyph.is_empty() {
                    return Err(RunebreakError::Validation(format!(
                        "Symbol {} has an empty glyph",
                        i
                    )));
                }
                let upper = glyph.to_uppercase();
                if seen.contains(&upper) {
                    return Err(RunebreakError::Validation(format!(
                        "Glyph '{}' is claimed by more than one symbol",
                        glyph
                    )));
                }
                seen.push(upper);
                lookup.push((glyph.chars().collect(), i as u8));
            }
        }

        // Longest-first gives greedy matching; lexicographic tiebreak keeps
        // the table order deterministic across identical inputs.
        lookup.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

        Ok(Self { symbols, lookup })
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Modulus for key arithmetic.
    pub fn n(&self) -> u8 {
        self.symbols.len() as u8
    }

    pub fn symbol(&self, index: u8) -> &Symbol {
        &self.symbols[index as usize]
    }

    pub fn glyph(&self, index: u8) -> &str {
        &self.symbols[index as usize].glyph
    }

    pub fn weight(&self, index: u8) -> Option<f64> {
        self.symbols[index as usize].weight
    }

    /// Exact canonical/alias lookup (case-insensitive), no tokenization.
    pub fn index_of(&self, glyph: &str) -> Option<u8> {
        let target: Vec<char> = glyph.chars().collect();
        self.lookup
            .iter()
            .find(|(chars, _)| chars_eq_ignore_case(chars, &target))
            .map(|&(_, idx)| idx)
    }

    fn match_at(&self, chars: &[char], pos: usize) -> Option<(u8, usize)> {
        for (glyph, idx) in &self.lookup {
            let end = pos + glyph.len();
            if end <= chars.len() && chars_eq_ignore_case(glyph, &chars[pos..end]) {
                return Some((*idx, glyph.len()));
            }
        }
        None
    }

    /// Strict tokenization: any character that does not start a known glyph
    /// fails with `UnknownGlyph` at that character position.
    pub fn tokenize(&self, text: &str) -> RbResult<CipherStream> {
        let chars: Vec<char> = text.chars().collect();
        let mut indices = Vec::with_capacity(chars.len());
        let mut pos = 0;
        while pos < chars.len() {
            match self.match_at(&chars, pos) {
                Some((idx, consumed)) => {
                    indices.push(idx);
                    pos += consumed;
                }
                None => {
                    let end = (pos + 8).min(chars.len());
                    return Err(RunebreakError::UnknownGlyph {
                        position: pos,
                        snippet: chars[pos..end].iter().collect(),
                    });
                }
            }
        }
        Ok(CipherStream::new(indices, Vec::new()))
    }

    /// Lenient tokenization: unmatched characters are skipped. Whitespace
    /// is recorded as word/line boundary marks so callers can reapply the
    /// original layout; the engine itself never reads the marks.
    pub fn tokenize_lossy(&self, text: &str) -> CipherStream {
        let chars: Vec<char> = text.chars().collect();
        let mut indices = Vec::with_capacity(chars.len());
        let mut marks = Vec::new();
        let mut pos = 0;
        while pos < chars.len() {
            if let Some((idx, consumed)) = self.match_at(&chars, pos) {
                indices.push(idx);
                pos += consumed;
                continue;
            }
            let c = chars[pos];
            if c == '\n' {
                marks.push(Mark::new(indices.len(), MarkKind::Line));
            } else if c.is_whitespace() {
                marks.push(Mark::new(indices.len(), MarkKind::Word));
            }
            pos += 1;
        }
        CipherStream::new(indices, marks)
    }

    /// Canonical glyphs, concatenated. Inverse of `tokenize` for texts made
    /// of canonical glyphs only.
    pub fn render(&self, indices: &[u8]) -> String {
        let mut out = String::with_capacity(indices.len() * 2);
        self.render_into(indices, &mut out);
        out
    }

    /// `render` into a caller-owned buffer (cleared first). The optimizer
    /// hot loop reuses one buffer across all candidate scorings.
    pub fn render_into(&self, indices: &[u8], out: &mut String) {
        out.clear();
        for &idx in indices {
            out.push_str(&self.symbols[idx as usize].glyph);
        }
    }
}

fn chars_eq_ignore_case(a: &[char], b: &[char]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b.iter())
            .all(|(x, y)| x == y || x.eq_ignore_ascii_case(y))
}

// --- JSON Definition ---

#[derive(Debug, Serialize, Deserialize)]
pub struct SymbolSpec {
    pub glyph: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub weight: Option<f64>,
}

/// On-disk alphabet document. Indices are implicit in symbol order.
#[derive(Debug, Serialize, Deserialize)]
pub struct AlphabetSpec {
    pub name: String,
    pub symbols: Vec<SymbolSpec>,
}

impl AlphabetSpec {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> RbResult<Alphabet> {
        let content = fs::read_to_string(path)?;
        let spec: AlphabetSpec = serde_json::from_str(&content)?;
        spec.into_alphabet()
    }

    pub fn into_alphabet(self) -> RbResult<Alphabet> {
        let symbols = self
            .symbols
            .into_iter()
            .enumerate()
            .map(|(i, s)| Symbol {
                index: i as u8,
                glyph: s.glyph,
                aliases: s.aliases,
                weight: s.weight,
            })
            .collect();
        Alphabet::new(symbols)
    }
}
