use crate::cipher::Operation;
use crate::error::{RbResult, RunebreakError};
use crate::optimizer::Strategy;
use clap::Args;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[command(flatten)]
    pub search: SearchParams,
    #[command(flatten)]
    pub weights: ScoreWeights,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
pub struct SearchParams {
    #[arg(long, default_value_t = 12)]
    pub max_key_length: usize,

    /// How many of the top IoC-ranked lengths get their own search tasks.
    #[arg(long, default_value_t = 4)]
    pub length_candidates: usize,

    /// Independent optimizer runs per (length, operation). Restart 0 starts
    /// from the frequency-estimated key, the rest from random keys.
    #[arg(long, default_value_t = 3)]
    pub restarts: usize,

    #[arg(long, default_value_t = 30_000)]
    pub max_iterations: usize,

    #[arg(long, default_value_t = 4_000)]
    pub max_no_improvement: usize,

    #[arg(long, default_value_t = 4.0)]
    pub temp_start: f32,

    #[arg(long, default_value_t = 0.9995)]
    pub cooling_rate: f32,

    /// anneal | hill_climb
    #[arg(long, default_value = "anneal")]
    pub strategy: String,

    /// Comma-separated cipher operations to try.
    #[arg(long, default_value = "sub,add")]
    pub operations: String,

    /// Glyph assumed to be the most frequent plaintext symbol when seeding
    /// keys from coset frequency analysis.
    #[arg(long, default_value = "E")]
    pub common_glyph: String,

    /// Grid widths probed for columnar transposition on the best result.
    #[arg(long, default_value = "2,3,4,5,6,7,8")]
    pub probe_widths: String,

    /// Rail counts probed for rail-fence transposition.
    #[arg(long, default_value = "2,3,4,5")]
    pub probe_rails: String,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            max_key_length: 12,
            length_candidates: 4,
            restarts: 3,
            max_iterations: 30_000,
            max_no_improvement: 4_000,
            temp_start: 4.0,
            cooling_rate: 0.9995,
            strategy: "anneal".to_string(),
            operations: "sub,add".to_string(),
            common_glyph: "E".to_string(),
            probe_widths: "2,3,4,5,6,7,8".to_string(),
            probe_rails: "2,3,4,5".to_string(),
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    #[arg(long, default_value_t = 1.0)]
    pub weight_bigram: f32,

    #[arg(long, default_value_t = 3.0)]
    pub weight_trigram: f32,

    #[arg(long, default_value_t = 6.0)]
    pub weight_quadgram: f32,

    #[arg(long, default_value_t = 12.0)]
    pub weight_keyword: f32,

    /// Divisor applied to raw corpus counts in the n-gram table.
    #[arg(long, default_value_t = 1.0)]
    pub corpus_scale: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            weight_bigram: 1.0,
            weight_trigram: 3.0,
            weight_quadgram: 6.0,
            weight_keyword: 12.0,
            corpus_scale: 1.0,
        }
    }
}

impl SearchParams {
    pub fn get_strategy(&self) -> RbResult<Strategy> {
        Strategy::from_str(self.strategy.trim()).map_err(|_| {
            RunebreakError::Config(format!("Unknown strategy '{}'", self.strategy))
        })
    }

    pub fn get_operations(&self) -> RbResult<Vec<Operation>> {
        let ops: Vec<Operation> = self
            .operations
            .split(',')
            .map(|s| {
                Operation::from_str(s.trim()).map_err(|_| {
                    RunebreakError::Config(format!("Unknown operation '{}'", s.trim()))
                })
            })
            .collect::<RbResult<_>>()?;
        if ops.is_empty() {
            return Err(RunebreakError::Config(
                "--operations requires at least one operation".to_string(),
            ));
        }
        Ok(ops)
    }

    pub fn get_probe_widths(&self) -> RbResult<Vec<usize>> {
        parse_usize_list(&self.probe_widths, "probe_widths")
    }

    pub fn get_probe_rails(&self) -> RbResult<Vec<usize>> {
        parse_usize_list(&self.probe_rails, "probe_rails")
    }
}

fn parse_usize_list(s: &str, name: &str) -> RbResult<Vec<usize>> {
    s.split(',')
        .filter(|p| !p.trim().is_empty())
        .map(|p| {
            p.trim()
                .parse()
                .map_err(|_| RunebreakError::Config(format!("Invalid number in --{}: '{}'", name, p)))
        })
        .collect()
}
