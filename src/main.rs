//! passgrind: structural passphrase recovery CLI
//!
//! Reads a key/value config file naming the target digest and seed literals,
//! runs the search and prints the matching expression tree.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use passgrind::{SearchConfig, SearchEngine, SearchOutcome};

#[derive(Parser, Debug)]
#[command(
    name = "passgrind",
    version,
    about = "Structural passphrase recovery",
    long_about = "passgrind: combine literals, counters, digests, substrings and concatenations until one matches a target digest"
)]
struct Cli {
    /// Config file to work on
    #[arg(long, short = 'i', env = "PASSGRIND_CONFIG", default_value = "example.cfg")]
    config: PathBuf,

    /// RNG seed (overrides RANDOM_SEED)
    #[arg(long)]
    seed: Option<u64>,

    /// Growth rounds (overrides GROWTH_ROUNDS)
    #[arg(long)]
    rounds: Option<usize>,

    /// Evaluations per sampled candidate (overrides STEPS_PER_CANDIDATE)
    #[arg(long)]
    steps: Option<usize>,

    /// Give up after this many evaluations (overrides MAX_TRIES)
    #[arg(long)]
    max_tries: Option<u64>,

    /// Log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_logging(level: &str) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let mut cfg = SearchConfig::load(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;

    if let Some(seed) = cli.seed {
        cfg.params.rng_seed = seed;
    }
    if let Some(rounds) = cli.rounds {
        cfg.params.growth_rounds = rounds;
    }
    if let Some(steps) = cli.steps {
        cfg.params.steps_per_candidate = steps;
    }
    if cli.max_tries.is_some() {
        cfg.params.max_tries = cli.max_tries;
    }

    let mut engine = SearchEngine::from_config(&cfg).context("seeding search")?;
    match engine.run().context("running search")? {
        SearchOutcome::Found(m) => {
            println!("Found! Expression is:");
            print!("{}", m.expression.describe());
            println!("bytes: {}", m.bytes.to_hex_grouped(4));
            println!("ascii: {}", m.bytes.to_ascii_lossy());
            println!("tries: {}", m.tries);
        }
        SearchOutcome::Exhausted { tries } => {
            println!("Nothing found, sorry. Number of expressions tested: {tries}");
        }
        SearchOutcome::BudgetSpent { tries } => {
            println!("Nothing found within the try budget. Number of expressions tested: {tries}");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
