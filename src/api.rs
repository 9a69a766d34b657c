use crate::alphabet::Alphabet;
use crate::error::RbResult;
use crate::optimizer::runner::{ProgressCallback, SearchEngine, SearchOptions, SearchResult};
use crate::scorer::ScoreModel;
use crate::stream::CipherStream;
use std::sync::Arc;

/// Service: run the full pipeline on glyph text. Tokenizes (strict or
/// lenient), ranks key lengths, seeds and refines keys, verifies
/// reversibility, and returns results sorted by descending score.
pub fn crack_text(
    text: &str,
    alphabet: &Arc<Alphabet>,
    model: Arc<ScoreModel>,
    options: SearchOptions,
    lenient: bool,
) -> RbResult<Vec<SearchResult>> {
    let stream = if lenient {
        alphabet.tokenize_lossy(text)
    } else {
        alphabet.tokenize(text)?
    };
    crack_stream(Arc::new(stream), model, options)
}

/// Service: same pipeline over an already-tokenized stream.
pub fn crack_stream(
    stream: Arc<CipherStream>,
    model: Arc<ScoreModel>,
    options: SearchOptions,
) -> RbResult<Vec<SearchResult>> {
    SearchEngine::new(model, options).run(stream)
}

/// As `crack_stream`, with progress reporting.
pub fn crack_stream_with<CB: ProgressCallback>(
    stream: Arc<CipherStream>,
    model: Arc<ScoreModel>,
    options: SearchOptions,
    callback: &CB,
) -> RbResult<Vec<SearchResult>> {
    SearchEngine::new(model, options).run_with(stream, callback)
}
