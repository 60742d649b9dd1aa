//! lexiprobe CLI: terminal front end for the vocabulary assessment.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod interactive;
mod output;

#[derive(Parser)]
#[command(name = "lexiprobe", version, about = "Vocabulary size assessment")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the adaptive tier assessment
    Level {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Tier word list, easiest first (repeat for each tier; overrides config)
        #[arg(long = "tier")]
        tiers: Vec<PathBuf>,

        /// Shuffle seed for a reproducible word order
        #[arg(long)]
        seed: Option<u64>,

        /// Directory to save the JSON report in
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Run a flat survey over the whole dictionary
    Survey {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Dictionary word list (overrides config)
        #[arg(long)]
        dictionary: Option<PathBuf>,

        /// Margin preset: rough, standard, precise
        #[arg(long)]
        margin: Option<String>,

        /// Size of the full dictionary the sample is projected onto
        #[arg(long)]
        total_words: Option<u64>,

        /// Shuffle seed for a reproducible word order
        #[arg(long)]
        seed: Option<u64>,

        /// Directory to save the JSON report in
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Compute an estimate from known counts
    Estimate {
        /// Known (passive) words in the sample
        #[arg(long)]
        known: u32,

        /// Sample size
        #[arg(long)]
        sample: u32,

        /// Active words in the sample; estimates both vocabularies when set
        #[arg(long)]
        active: Option<u32>,

        /// Total dictionary size (total-population mode)
        #[arg(long, conflicts_with_all = ["min_words", "max_words"])]
        total_words: Option<u64>,

        /// Lower bound of the tier range (proportional-range mode)
        #[arg(long, requires = "max_words")]
        min_words: Option<u64>,

        /// Upper bound of the tier range (proportional-range mode)
        #[arg(long, requires = "min_words")]
        max_words: Option<u64>,

        /// Passive share below which the result is inconclusive
        #[arg(long, default_value = "0.15")]
        inconclusive_fraction: f64,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Validate the configuration and word lists
    Validate {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config and sample word lists
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lexiprobe=warn".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Level {
            config,
            tiers,
            seed,
            output,
            format,
        } => commands::level::execute(config, tiers, seed, output, format).await,
        Commands::Survey {
            config,
            dictionary,
            margin,
            total_words,
            seed,
            output,
            format,
        } => {
            commands::survey::execute(
                config,
                dictionary,
                margin,
                total_words,
                seed,
                output,
                format,
            )
            .await
        }
        Commands::Estimate {
            known,
            sample,
            active,
            total_words,
            min_words,
            max_words,
            inconclusive_fraction,
            format,
        } => commands::estimate::execute(
            known,
            sample,
            active,
            total_words,
            min_words.zip(max_words),
            inconclusive_fraction,
            format,
        ),
        Commands::Validate { config } => commands::validate::execute(config).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
