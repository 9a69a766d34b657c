use super::ScoreRule;
use crate::config::ScoreWeights;
use crate::error::RbResult;
use std::io::Read;
use tracing::debug;

/// Reads the n-gram weight table: one `gram<TAB>count` row per line, no
/// header. Counts are divided by `corpus_scale` and scaled by the class
/// weight for the gram's character length. Malformed rows are skipped.
pub fn load_ngrams<R: Read>(reader: R, weights: &ScoreWeights) -> RbResult<Vec<ScoreRule>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .from_reader(reader);

    let mut rules = Vec::new();
    let mut skipped = 0;

    for result in rdr.records() {
        let rec = match result {
            Ok(r) => r,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };
        if rec.len() < 2 {
            skipped += 1;
            continue;
        }

        let gram = rec[0].trim().to_uppercase();
        if gram.is_empty() {
            skipped += 1;
            continue;
        }

        let count: f32 = match rec[1].trim().parse() {
            Ok(v) => v,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };

        let class_weight = match gram.chars().count() {
            0 | 1 => {
                skipped += 1;
                continue;
            }
            2 => weights.weight_bigram,
            3 => weights.weight_trigram,
            _ => weights.weight_quadgram,
        };

        rules.push(ScoreRule {
            pattern: gram,
            weight: count / weights.corpus_scale * class_weight,
        });
    }

    if skipped > 0 {
        debug!("Skipped {} invalid rows in n-gram table", skipped);
    }
    debug!("Loaded {} n-gram rules", rules.len());
    Ok(rules)
}

/// Reads the keyword bonus list: `word,bonus` CSV rows, no header. Bonuses
/// are scaled by `weight_keyword`.
pub fn load_keywords<R: Read>(reader: R, weights: &ScoreWeights) -> RbResult<Vec<ScoreRule>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rules = Vec::new();
    let mut skipped = 0;

    for result in rdr.records() {
        let rec = match result {
            Ok(r) => r,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };
        if rec.is_empty() {
            continue;
        }

        let word = rec[0].trim().to_uppercase();
        if word.is_empty() {
            skipped += 1;
            continue;
        }

        // A missing bonus column means 1.0x the keyword weight.
        let bonus: f32 = if rec.len() > 1 {
            match rec[1].trim().parse() {
                Ok(v) => v,
                Err(_) => {
                    skipped += 1;
                    continue;
                }
            }
        } else {
            1.0
        };

        rules.push(ScoreRule {
            pattern: word,
            weight: bonus * weights.weight_keyword,
        });
    }

    if skipped > 0 {
        debug!("Skipped {} invalid rows in keyword list", skipped);
    }
    Ok(rules)
}
