use clap::{Parser, Subcommand};
use runebreak::alphabet::{Alphabet, AlphabetSpec};
use runebreak::alphabets::KnownAlphabet;
use strum::IntoEnumIterator;
use runebreak::scorer::ScoreModel;
use std::path::Path;
use std::process;
use std::str::FromStr;
use std::sync::Arc;

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Alphabet preset name (gematria-primus, latin26) or a JSON file path.
    #[arg(global = true, short, long, default_value = "gematria-primus")]
    alphabet: String,

    #[arg(global = true, short, long, default_value = "data/english_ngrams.tsv")]
    ngrams: String,

    #[arg(global = true, short, long, default_value = "data/keywords.csv")]
    keywords: String,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the full key search pipeline on a ciphertext file.
    Search(cmd::search::SearchArgs),
    /// Print key-length statistics (coset IoC, Kasiski) for a ciphertext.
    Analyze(cmd::analyze::AnalyzeArgs),
}

fn load_alphabet(spec: &str) -> Arc<Alphabet> {
    let result = if Path::new(spec).exists() {
        println!("📜 Loading Alphabet from: {}", spec);
        AlphabetSpec::load_from_file(spec)
    } else {
        match KnownAlphabet::from_str(spec) {
            Ok(preset) => preset.build(),
            Err(_) => {
                let presets: Vec<String> =
                    KnownAlphabet::iter().map(|p| p.to_string()).collect();
                eprintln!(
                    "❌ '{}' is neither an alphabet file nor a known preset ({}).",
                    spec,
                    presets.join(", ")
                );
                process::exit(1);
            }
        }
    };
    match result {
        Ok(a) => Arc::new(a),
        Err(e) => {
            eprintln!("❌ FATAL ERROR LOADING ALPHABET:\n   {}", e);
            process::exit(1);
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    } else {
        tracing_subscriber::fmt::init();
    }

    println!("\n🚀 Initializing Runebreak...");
    let alphabet = load_alphabet(&cli.alphabet);
    println!("🔤 Alphabet: {} symbols", alphabet.len());

    // Score weights live in the subcommand's flattened config.
    let weights = match &cli.command {
        Commands::Search(args) => args.config.weights.clone(),
        Commands::Analyze(args) => args.config.weights.clone(),
    };

    let keywords = if Path::new(&cli.keywords).exists() {
        Some(cli.keywords.as_str())
    } else {
        eprintln!("⚠️  Keyword list '{}' not found. Skipping.", cli.keywords);
        None
    };

    let model = match ScoreModel::from_files(alphabet.clone(), &cli.ngrams, keywords, &weights) {
        Ok(m) => Arc::new(m),
        Err(e) => {
            eprintln!("\n❌ FATAL ERROR BUILDING SCORE MODEL:\n   {}", e);
            process::exit(1);
        }
    };
    println!("⚖️  Score model: {} rules", model.rule_count());

    match cli.command {
        Commands::Search(args) => cmd::search::run(args, alphabet, model),
        Commands::Analyze(args) => cmd::analyze::run(args, alphabet),
    }
}
