pub mod loader;

use crate::alphabet::Alphabet;
use crate::config::ScoreWeights;
use crate::error::{RbResult, RunebreakError};
use std::io::Read;
use std::sync::Arc;
use tracing::warn;

/// One weighted text pattern. Positive weights reward occurrences.
#[derive(Debug, Clone)]
pub struct ScoreRule {
    pub pattern: String,
    pub weight: f32,
}

/// A weighted-sum English-likeness model over rendered plaintext.
///
/// `score` renders candidate symbols through the alphabet's canonical
/// glyphs and sums `weight * overlapping_occurrences(pattern)` across all
/// rules. Scores carry no length normalization, so they are comparable
/// only between candidates for the same ciphertext.
pub struct ScoreModel {
    alphabet: Arc<Alphabet>,
    rules: Vec<ScoreRule>,
}

impl ScoreModel {
    pub fn new(alphabet: Arc<Alphabet>, mut rules: Vec<ScoreRule>) -> Self {
        rules.retain(|r| {
            if r.pattern.is_empty() {
                warn!("Dropping score rule with empty pattern");
                return false;
            }
            true
        });
        if rules.is_empty() {
            warn!("Score model has no rules; every candidate will score 0");
        }
        Self { alphabet, rules }
    }

    /// Builds a model from the n-gram TSV and optional keyword CSV,
    /// applying the configured class weights.
    pub fn from_files(
        alphabet: Arc<Alphabet>,
        ngrams_path: &str,
        keywords_path: Option<&str>,
        weights: &ScoreWeights,
    ) -> RbResult<Self> {
        let ngram_file = std::fs::File::open(ngrams_path).map_err(|e| {
            RunebreakError::Config(format!("Could not open n-gram table '{}': {}", ngrams_path, e))
        })?;
        let mut rules = loader::load_ngrams(ngram_file, weights)?;

        if let Some(path) = keywords_path {
            let keyword_file = std::fs::File::open(path).map_err(|e| {
                RunebreakError::Config(format!("Could not open keyword list '{}': {}", path, e))
            })?;
            rules.extend(loader::load_keywords(keyword_file, weights)?);
        }

        Ok(Self::new(alphabet, rules))
    }

    /// In-memory variant used by tests and embedded callers.
    pub fn from_readers<R1: Read, R2: Read>(
        alphabet: Arc<Alphabet>,
        ngrams: R1,
        keywords: Option<R2>,
        weights: &ScoreWeights,
    ) -> RbResult<Self> {
        let mut rules = loader::load_ngrams(ngrams, weights)?;
        if let Some(r) = keywords {
            rules.extend(loader::load_keywords(r, weights)?);
        }
        Ok(Self::new(alphabet, rules))
    }

    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn score(&self, symbols: &[u8]) -> f32 {
        let mut buf = String::new();
        self.score_with_buf(symbols, &mut buf)
    }

    /// Hot-loop variant: renders into a caller-owned buffer so the
    /// optimizer does not allocate per candidate.
    pub fn score_with_buf(&self, symbols: &[u8], buf: &mut String) -> f32 {
        self.alphabet.render_into(symbols, buf);
        self.score_text(buf)
    }

    pub fn score_text(&self, text: &str) -> f32 {
        let bytes = text.as_bytes();
        let mut total = 0.0;
        for rule in &self.rules {
            let n = count_occurrences(bytes, rule.pattern.as_bytes());
            if n > 0 {
                total += rule.weight * n as f32;
            }
        }
        total
    }
}

/// Overlapping occurrence count.
fn count_occurrences(haystack: &[u8], needle: &[u8]) -> usize {
    if needle.is_empty() || haystack.len() < needle.len() {
        return 0;
    }
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}
