pub mod runner;
pub mod seed;

use crate::cipher::{decrypt_into, Operation};
use crate::scorer::ScoreModel;
use crate::stream::CipherStream;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    HillClimb,
    Anneal,
}

#[inline(always)]
fn fast_exp(x: f32) -> f32 {
    let x = 1.0 + x / 256.0;
    let x = x * x * x * x * x * x * x * x; // (1+x/256)^256 approx exp(x)
    x * x
}

/// Stopping rules shared by both strategies. `deadline` and `stop` end a
/// run early with `partial = true`; the task still reports its best.
pub struct RunBudget<'a> {
    pub max_evaluations: usize,
    pub max_no_improvement: usize,
    pub deadline: Option<Instant>,
    pub stop: Option<&'a AtomicBool>,
}

impl RunBudget<'_> {
    fn interrupted(&self) -> bool {
        if let Some(flag) = self.stop {
            if flag.load(Ordering::Relaxed) {
                return true;
            }
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return true;
            }
        }
        false
    }
}

/// One local-search run over key space: a private mutable key, its current
/// score, and the best pair ever observed. Annealing may walk the current
/// state downhill, but the reported best never regresses.
pub struct SearchTask {
    model: Arc<ScoreModel>,
    stream: Arc<CipherStream>,
    op: Operation,
    n: u8,

    pub key: Vec<u8>,
    pub score: f32,
    pub best_key: Vec<u8>,
    pub best_score: f32,

    temperature: f32,
    cooling_rate: f32,
    rng: fastrand::Rng,

    evaluations: usize,

    // Scratch reused across every candidate evaluation
    plain_buf: Vec<u8>,
    text_buf: String,
}

impl SearchTask {
    pub fn new(
        model: Arc<ScoreModel>,
        stream: Arc<CipherStream>,
        op: Operation,
        key: Vec<u8>,
        temp_start: f32,
        cooling_rate: f32,
        rng: fastrand::Rng,
    ) -> Self {
        let n = model.alphabet().n();
        let mut task = Self {
            model,
            stream,
            op,
            n,
            best_key: key.clone(),
            key,
            score: 0.0,
            best_score: f32::MIN,
            temperature: temp_start,
            cooling_rate,
            rng,
            evaluations: 0,
            plain_buf: Vec::new(),
            text_buf: String::new(),
        };
        task.score = task.evaluate();
        task.best_score = task.score;
        task
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    fn evaluate(&mut self) -> f32 {
        self.evaluations += 1;
        decrypt_into(
            self.op,
            self.stream.indices(),
            &self.key,
            self.n,
            &mut self.plain_buf,
        );
        self.model.score_with_buf(&self.plain_buf, &mut self.text_buf)
    }

    fn note_best(&mut self) {
        if self.score > self.best_score {
            self.best_score = self.score;
            self.best_key.clear();
            self.best_key.extend_from_slice(&self.key);
        }
    }

    /// One full coordinate pass: at each position, try every value and keep
    /// the best strict improvement. Returns true if any move improved.
    pub fn hill_climb_pass(&mut self, budget: &RunBudget) -> bool {
        let mut improved = false;
        for pos in 0..self.key.len() {
            let original = self.key[pos];
            let mut best_val = original;
            let mut best_val_score = self.score;
            for value in 0..self.n {
                if value == original {
                    continue;
                }
                self.key[pos] = value;
                let s = self.evaluate();
                if s > best_val_score {
                    best_val = value;
                    best_val_score = s;
                }
            }
            self.key[pos] = best_val;
            if best_val != original {
                self.score = best_val_score;
                self.note_best();
                improved = true;
            }
            if self.evaluations >= budget.max_evaluations || budget.interrupted() {
                return improved;
            }
        }
        improved
    }

    /// One annealing move: random position, random new value; accept on
    /// improvement, or with probability exp(delta/T) on a worsening.
    /// Returns true if the move was accepted.
    pub fn anneal_step(&mut self) -> bool {
        let pos = self.rng.usize(0..self.key.len());
        let old = self.key[pos];
        let candidate = self.rng.u8(0..self.n);
        if candidate == old {
            return false;
        }

        self.key[pos] = candidate;
        let new_score = self.evaluate();
        let delta = new_score - self.score;

        // Metropolis Criterion
        let accept = delta > 0.0 || self.rng.f32() < fast_exp(delta / self.temperature);
        if accept {
            self.score = new_score;
            self.note_best();
        } else {
            self.key[pos] = old;
        }
        accept
    }

    /// Runs the task to completion under `budget`. Returns true if the run
    /// was cut short (deadline or external stop) rather than finishing.
    pub fn run(&mut self, strategy: Strategy, budget: &RunBudget) -> bool {
        match strategy {
            Strategy::HillClimb => loop {
                let improved = self.hill_climb_pass(budget);
                if budget.interrupted() {
                    return true;
                }
                if !improved || self.evaluations >= budget.max_evaluations {
                    return false;
                }
            },
            Strategy::Anneal => {
                let mut since_improvement = 0;
                while self.evaluations < budget.max_evaluations {
                    if self.evaluations % 256 == 0 && budget.interrupted() {
                        return true;
                    }

                    let before = self.best_score;
                    self.anneal_step();
                    self.temperature = (self.temperature * self.cooling_rate).max(1e-4);

                    if self.best_score > before {
                        since_improvement = 0;
                    } else {
                        since_improvement += 1;
                        if since_improvement >= budget.max_no_improvement {
                            return false;
                        }
                    }
                }
                false
            }
        }
    }
}
