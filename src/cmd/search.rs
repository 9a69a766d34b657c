use crate::reports;
use clap::Args;
use runebreak::alphabet::Alphabet;
use runebreak::config::Config;
use runebreak::optimizer::runner::{ProgressCallback, SearchEngine, SearchOptions, SearchResult};
use runebreak::scorer::ScoreModel;
use runebreak::stream::CipherStream;
use runebreak::transpose;
use std::process;
use std::sync::Arc;
use std::time::Duration;

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    #[command(flatten)]
    pub config: Config,

    /// File of glyph text to attack.
    pub input: String,

    /// Wall-clock budget in seconds.
    #[arg(short = 'T', long)]
    pub time: Option<u64>,

    #[arg(short = 'S', long)]
    pub seed: Option<u64>,

    /// Skip characters that match no glyph instead of failing.
    #[arg(long, default_value_t = false)]
    pub lenient: bool,

    /// Emit the ranked result list as JSON instead of tables.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Re-score transposition re-orderings of the ciphertext as well.
    #[arg(long, default_value_t = false)]
    pub probe: bool,

    /// How many results to print.
    #[arg(long, default_value_t = 10)]
    pub top: usize,
}

struct ConsoleProgress;

impl ProgressCallback for ConsoleProgress {
    fn on_task_done(&self, completed: usize, total: usize, best: Option<&SearchResult>) -> bool {
        if let Some(b) = best {
            println!(
                "  ⏳ {}/{} tasks | Best: {:.1} (len {}, {})",
                completed, total, b.score, b.key_length, b.operation
            );
        }
        true
    }
}

pub fn run(args: SearchArgs, alphabet: Arc<Alphabet>, model: Arc<ScoreModel>) {
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
                eprintln!("   (use --lenient to skip unknown characters)");
                process::exit(1);
            }
        }
    };
    println!("🔣 Tokenized {} symbols from {}", stream.len(), args.input);

    let mut options = match SearchOptions::from_config(&args.config, &alphabet) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("❌ {}", e);
            process::exit(1);
        }
    };
    options.seed = args.seed;
    options.max_time = args.time.map(Duration::from_secs);

    let stream = Arc::new(stream);
    let engine = SearchEngine::new(model.clone(), options);

    println!("🔥 Launching key search...");
    let results = match engine.run_with(stream.clone(), &ConsoleProgress) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("❌ {}", e);
            process::exit(1);
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&results) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("❌ JSON encoding failed: {}", e),
        }
    } else {
        println!("\n=== 🏆 RANKED RESULTS ===");
        reports::print_results(&results, args.top);
        if let Some(best) = results.first() {
            println!("\nBest decryption:");
            println!("{}", best.plaintext(&stream, &alphabet));
        }
    }

    if args.probe {
        run_probe(&args, &stream, &model);
    }
}

fn run_probe(args: &SearchArgs, stream: &CipherStream, model: &ScoreModel) {
    let widths = args.config.search.get_probe_widths().unwrap_or_default();
    let rails = args.config.search.get_probe_rails().unwrap_or_default();
    match transpose::probe(stream, model, &widths, &rails) {
        Ok(probes) => reports::print_probes(&probes),
        Err(e) => eprintln!("❌ Probe failed: {}", e),
    }
}
