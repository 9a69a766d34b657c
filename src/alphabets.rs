use crate::alphabet::{Alphabet, Symbol};
use crate::error::RbResult;
use strum_macros::{Display, EnumIter, EnumString};

/// Built-in alphabet presets, parseable by name on the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum KnownAlphabet {
    GematriaPrimus,
    Latin26,
}

// (canonical glyph, rune character, extra transliteration aliases, prime)
const GEMATRIA_PRIMUS: &[(&str, &str, &[&str], u32)] = &[
    ("F", "ᚠ", &[], 2),
    ("U", "ᚢ", &[], 3),
    ("TH", "ᚦ", &[], 5),
    ("O", "ᚩ", &[], 7),
    ("R", "ᚱ", &[], 11),
    ("C", "ᚳ", &["K"], 13),
    ("G", "ᚷ", &[], 17),
    ("W", "ᚹ", &[], 19),
    ("H", "ᚻ", &[], 23),
    ("N", "ᚾ", &[], 29),
    ("I", "ᛁ", &[], 31),
    ("J", "ᛄ", &[], 37),
    ("EO", "ᛇ", &[], 41),
    ("P", "ᛈ", &[], 43),
    ("X", "ᛉ", &[], 47),
    ("S", "ᛋ", &["Z"], 53),
    ("T", "ᛏ", &[], 59),
    ("B", "ᛒ", &[], 61),
    ("E", "ᛖ", &[], 67),
    ("M", "ᛗ", &[], 71),
    ("L", "ᛚ", &[], 73),
    ("NG", "ᛝ", &["ING"], 79),
    ("OE", "ᛟ", &[], 83),
    ("D", "ᛞ", &[], 89),
    ("A", "ᚪ", &[], 97),
    ("AE", "ᚫ", &[], 101),
    ("Y", "ᚣ", &[], 103),
    ("IA", "ᛡ", &["IO"], 107),
    ("EA", "ᛠ", &[], 109),
];

impl KnownAlphabet {
    pub fn build(&self) -> RbResult<Alphabet> {
        match self {
            Self::GematriaPrimus => {
                let symbols = GEMATRIA_PRIMUS
                    .iter()
                    .enumerate()
                    .map(|(i, (glyph, rune, extra, prime))| {
                        let mut aliases = vec![rune.to_string()];
                        aliases.extend(extra.iter().map(|a| a.to_string()));
                        Symbol {
                            index: i as u8,
                            glyph: glyph.to_string(),
                            aliases,
                            weight: Some(*prime as f64),
                        }
                    })
                    .collect();
                Alphabet::new(symbols)
            }
            Self::Latin26 => {
                let symbols = (b'A'..=b'Z')
                    .enumerate()
                    .map(|(i, c)| Symbol {
                        index: i as u8,
                        glyph: (c as char).to_string(),
                        aliases: Vec::new(),
                        weight: None,
                    })
                    .collect();
                Alphabet::new(symbols)
            }
        }
    }
}
