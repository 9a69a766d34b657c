use crate::stream::CipherStream;
use std::collections::HashMap;

/// Index of Coincidence, normalized by alphabet size so that a uniformly
/// random sequence sits near 1.0 and natural-language text well above it.
/// Undefined for fewer than two symbols (returns 0.0).
pub fn index_of_coincidence(slice: &[u8], n_symbols: u8) -> f64 {
    let n = slice.len();
    if n < 2 {
        return 0.0;
    }
    let mut counts = [0u64; 256];
    for &s in slice {
        counts[s as usize] += 1;
    }
    let coincidences: u64 = counts
        .iter()
        .take(n_symbols as usize)
        .map(|&c| c * c.saturating_sub(1))
        .sum();
    coincidences as f64 / (n as f64 * (n as f64 - 1.0)) * n_symbols as f64
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LengthScore {
    pub length: usize,
    pub avg_coset_ioc: f64,
}

/// Coset-IoC key length estimation: for each candidate length L the stream
/// splits into L interleaved cosets; at the true key length each coset is a
/// monoalphabetic shift of plaintext and keeps its high IoC.
/// Returns candidates 2..=max_length ranked by descending average coset IoC
/// (ties broken toward the shorter length).
pub fn estimate_key_length(
    stream: &CipherStream,
    max_length: usize,
    n_symbols: u8,
) -> Vec<LengthScore> {
    let mut scores = Vec::new();
    for length in 2..=max_length {
        if length * 2 > stream.len() {
            break;
        }
        let total: f64 = (0..length)
            .map(|offset| index_of_coincidence(&stream.coset(offset, length), n_symbols))
            .sum();
        scores.push(LengthScore {
            length,
            avg_coset_ioc: total / length as f64,
        });
    }
    scores.sort_by(|a, b| {
        b.avg_coset_ioc
            .partial_cmp(&a.avg_coset_ioc)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.length.cmp(&b.length))
    });
    scores
}

/// Kasiski examination: repeated n-grams in the ciphertext tend to be the
/// same plaintext fragment hit by the same key alignment, so the distances
/// between repetitions are multiples of the key length. Every divisor of
/// every pairwise distance gets one vote; returns (length, votes) sorted by
/// votes descending, ties toward the shorter length.
pub fn kasiski_examination(
    stream: &CipherStream,
    min_ngram: usize,
    max_length: usize,
) -> Vec<(usize, usize)> {
    let indices = stream.indices();
    if indices.len() < min_ngram * 2 {
        return Vec::new();
    }

    let mut positions: HashMap<&[u8], Vec<usize>> = HashMap::new();
    for (i, window) in indices.windows(min_ngram).enumerate() {
        positions.entry(window).or_default().push(i);
    }

    let mut votes = vec![0usize; max_length + 1];
    for occurrences in positions.values() {
        if occurrences.len() < 2 {
            continue;
        }
        for (a, &first) in occurrences.iter().enumerate() {
            for &second in &occurrences[a + 1..] {
                let distance = second - first;
                for length in 2..=max_length {
                    if distance % length == 0 {
                        votes[length] += 1;
                    }
                }
            }
        }
    }

    let mut ranked: Vec<(usize, usize)> = votes
        .into_iter()
        .enumerate()
        .skip(2)
        .filter(|&(_, v)| v > 0)
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

/// The merged ranking the search runner feeds on: the `take` best lengths
/// by coset IoC, then Kasiski's top divisors appended where not already
/// present. Deterministic for identical inputs.
pub fn rank_key_lengths(stream: &CipherStream, max_length: usize, take: usize, n_symbols: u8) -> Vec<usize> {
    let mut lengths: Vec<usize> = estimate_key_length(stream, max_length, n_symbols)
        .into_iter()
        .take(take)
        .map(|s| s.length)
        .collect();

    for (length, _votes) in kasiski_examination(stream, 3, max_length).into_iter().take(3) {
        if !lengths.contains(&length) {
            lengths.push(length);
        }
    }

    if lengths.is_empty() && stream.len() >= 2 {
        // Stream too short for coset statistics; fall back to every length.
        lengths.extend(2..=max_length.min(stream.len() - 1));
    }
    lengths
}
