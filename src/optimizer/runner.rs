use crate::alphabet::Alphabet;
use crate::cipher::{decrypt_stream, Operation};
use crate::config::Config;
use crate::error::{RbResult, RunebreakError};
use crate::optimizer::{seed, RunBudget, SearchTask, Strategy};
use crate::scorer::ScoreModel;
use crate::stats;
use crate::stream::CipherStream;
use crate::verifier;
use rayon::prelude::*;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub struct SearchOptions {
    pub max_key_length: usize,
    pub length_candidates: usize,
    pub restarts: usize,
    pub max_iterations: usize,
    pub max_no_improvement: usize,
    pub temp_start: f32,
    pub cooling_rate: f32,
    pub strategy: Strategy,
    pub operations: Vec<Operation>,
    pub assumed_common: u8,
    pub seed: Option<u64>,
    pub max_time: Option<Duration>,
    pub preview_symbols: usize,
}

impl SearchOptions {
    /// Resolves CLI config against the alphabet (strategy and operation
    /// names, the assumed-common glyph). Fails fast on bad values.
    pub fn from_config(config: &Config, alphabet: &Alphabet) -> RbResult<Self> {
        let glyph = config.search.common_glyph.trim();
        let assumed_common = alphabet.index_of(glyph).ok_or_else(|| {
            RunebreakError::Config(format!(
                "--common-glyph '{}' is not in the alphabet",
                glyph
            ))
        })?;

        Ok(Self {
            max_key_length: config.search.max_key_length,
            length_candidates: config.search.length_candidates,
            restarts: config.search.restarts,
            max_iterations: config.search.max_iterations,
            max_no_improvement: config.search.max_no_improvement,
            temp_start: config.search.temp_start,
            cooling_rate: config.search.cooling_rate,
            strategy: config.search.get_strategy()?,
            operations: config.search.get_operations()?,
            assumed_common,
            seed: None,
            max_time: None,
            preview_symbols: 64,
        })
    }
}

/// The immutable record one search task emits. Results only combine
/// through sorting/max-reduction, never by mutating shared state.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub key_length: usize,
    pub key: Vec<u8>,
    pub operation: Operation,
    pub score: f32,
    pub plaintext_preview: String,
    /// False when re-encrypting the decryption fails to reproduce the
    /// ciphertext (Xor over a non-power-of-two alphabet).
    pub reversible: bool,
    /// True when the task was cut short by the time budget or an abort.
    pub partial: bool,
}

impl SearchResult {
    /// Full decryption under this result's key. Recomputed on demand so
    /// result records stay small.
    pub fn plaintext(&self, stream: &CipherStream, alphabet: &Alphabet) -> String {
        let plain = decrypt_stream(self.operation, stream.indices(), &self.key, alphabet.n());
        alphabet.render(&plain)
    }
}

/// Receives task completions. Returning false aborts the remaining tasks;
/// in-flight tasks still return their best-so-far.
pub trait ProgressCallback: Send + Sync {
    fn on_task_done(&self, completed: usize, total: usize, best: Option<&SearchResult>) -> bool;
}

pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_task_done(&self, _completed: usize, _total: usize, _best: Option<&SearchResult>) -> bool {
        true
    }
}

/// Fans independent (key length, operation, restart) tasks over a rayon
/// pool. The alphabet, stream, and score model are shared read-only; each
/// task owns its key privately and emits one immutable result.
pub struct SearchEngine {
    model: Arc<ScoreModel>,
    options: SearchOptions,
}

struct TaskSpec {
    length: usize,
    op: Operation,
    restart: usize,
    seed: Option<u64>,
}

impl SearchEngine {
    pub fn new(model: Arc<ScoreModel>, options: SearchOptions) -> Self {
        Self { model, options }
    }

    fn validate(&self, stream: &CipherStream) -> RbResult<()> {
        let opts = &self.options;
        if stream.is_empty() {
            return Err(RunebreakError::Config("Cipher stream is empty".to_string()));
        }
        if opts.max_key_length < 1 || opts.max_key_length > stream.len() {
            return Err(RunebreakError::Config(format!(
                "max_key_length {} outside [1, {}]",
                opts.max_key_length,
                stream.len()
            )));
        }
        if opts.restarts < 1 {
            return Err(RunebreakError::Config("restarts must be >= 1".to_string()));
        }
        if !(opts.cooling_rate > 0.0 && opts.cooling_rate < 1.0) {
            return Err(RunebreakError::Config(format!(
                "cooling_rate {} outside (0, 1)",
                opts.cooling_rate
            )));
        }
        if opts.operations.is_empty() {
            return Err(RunebreakError::Config("No operations configured".to_string()));
        }
        if self.model.rule_count() == 0 {
            warn!("Score model is empty; search will not discriminate candidates");
        }
        Ok(())
    }

    pub fn run(&self, stream: Arc<CipherStream>) -> RbResult<Vec<SearchResult>> {
        self.run_with(stream, &NoProgress)
    }

    pub fn run_with<CB: ProgressCallback>(
        &self,
        stream: Arc<CipherStream>,
        callback: &CB,
    ) -> RbResult<Vec<SearchResult>> {
        self.validate(&stream)?;

        let opts = &self.options;
        let alphabet = self.model.alphabet().clone();
        let n = alphabet.n();

        let lengths = stats::rank_key_lengths(
            &stream,
            opts.max_key_length.min(stream.len().saturating_sub(1)).max(1),
            opts.length_candidates,
            n,
        );
        let lengths = if lengths.is_empty() { vec![1] } else { lengths };
        info!("Key length candidates: {:?}", lengths);

        let mut specs = Vec::new();
        for &length in &lengths {
            for &op in &opts.operations {
                for restart in 0..opts.restarts {
                    let task_seed = opts.seed.map(|s| s + specs.len() as u64);
                    specs.push(TaskSpec {
                        length,
                        op,
                        restart,
                        seed: task_seed,
                    });
                }
            }
        }

        let total = specs.len();
        let deadline = opts.max_time.map(|d| Instant::now() + d);
        let stop = AtomicBool::new(false);
        let completed = AtomicUsize::new(0);
        let best_so_far: Mutex<Option<SearchResult>> = Mutex::new(None);

        let mut results: Vec<SearchResult> = specs
            .into_par_iter()
            .map(|spec| {
                let mut rng = match spec.seed {
                    Some(s) => fastrand::Rng::with_seed(s),
                    None => fastrand::Rng::new(),
                };

                // Restart 0 starts from the frequency estimate; later
                // restarts diversify from random keys.
                let initial = if spec.restart == 0 {
                    seed::estimate_key(&stream, spec.length, opts.assumed_common, spec.op, n)
                } else {
                    seed::random_key(&mut rng, spec.length, n)
                };

                let mut task = SearchTask::new(
                    self.model.clone(),
                    stream.clone(),
                    spec.op,
                    initial,
                    opts.temp_start,
                    opts.cooling_rate,
                    rng,
                );

                let budget = RunBudget {
                    max_evaluations: opts.max_iterations,
                    max_no_improvement: opts.max_no_improvement,
                    deadline,
                    stop: Some(&stop),
                };
                let partial = task.run(opts.strategy, &budget);

                let reversible = verifier::verify(&stream, &task.best_key, spec.op, n);
                if !reversible {
                    warn!(
                        "Key (length {}, {}) failed the reversibility check",
                        spec.length, spec.op
                    );
                }

                let plain = decrypt_stream(spec.op, stream.indices(), &task.best_key, n);
                let preview_len = opts.preview_symbols.min(plain.len());
                let result = SearchResult {
                    key_length: spec.length,
                    key: task.best_key.clone(),
                    operation: spec.op,
                    score: task.best_score,
                    plaintext_preview: alphabet.render(&plain[..preview_len]),
                    reversible,
                    partial,
                };

                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                {
                    let mut best = best_so_far.lock().unwrap_or_else(|e| e.into_inner());
                    let improved = best
                        .as_ref()
                        .map(|b| result.score > b.score)
                        .unwrap_or(true);
                    if improved {
                        *best = Some(result.clone());
                    }
                    if !callback.on_task_done(done, total, best.as_ref()) {
                        stop.store(true, Ordering::Relaxed);
                    }
                }

                result
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.key_length.cmp(&b.key_length))
        });
        Ok(results)
    }
}
