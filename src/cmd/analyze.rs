use crate::reports;
use clap::Args;
use runebreak::alphabet::Alphabet;
use runebreak::config::Config;
use runebreak::stats;
use std::process;
use std::sync::Arc;

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub config: Config,

    /// File of glyph text to analyze.
    pub input: String,

    #[arg(long, default_value_t = false)]
    pub lenient: bool,
}

pub fn run(args: AnalyzeArgs, alphabet: Arc<Alphabet>) {
    let text = std::fs::read_to_string(&args.input).unwrap_or_else(|e| {
        eprintln!("❌ Could not read '{}': {}", args.input, e);
        process::exit(1);
    });

    let stream = if args.lenient {
        alphabet.tokenize_lossy(&text)
    } else {
        match alphabet.tokenize(&text) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("❌ {}", e);
                process::exit(1);
            }
        }
    };

    let n = alphabet.n();
    println!("\n🔎 === STREAM ANALYSIS === 🔎");
    println!("Symbols: {}", stream.len());
    println!(
        "Whole-stream IoC: {:.4} (≈1.0 uniform, >1.5 language-like)",
        stats::index_of_coincidence(stream.indices(), n)
    );

    // Gematria-style weight sum, when the alphabet defines symbol weights.
    let weight_sum: Option<f64> = stream
        .indices()
        .iter()
        .map(|&i| alphabet.weight(i))
        .sum();
    if let Some(total) = weight_sum {
        println!("Symbol weight sum: {}", total);
    }

    let max_len = args.config.search.max_key_length.min(stream.len().saturating_sub(1));
    let ioc = stats::estimate_key_length(&stream, max_len, n);
    let kasiski = stats::kasiski_examination(&stream, 3, max_len);
    reports::print_length_analysis(&ioc, &kasiski);
}
