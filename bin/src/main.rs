//! prime CLI binary.
//!
//! Provides the command-line interface for the prime stock selection model.

mod cmd;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use prime::{
    CachedReturns, CrossSection, MemoryCache, MetricProvider, PipelineConfig, PrimeModel,
    export,
    fmp::{FileCache, FmpProvider},
    traits::StaticProvider,
};
use std::{path::PathBuf, process};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "prime")]
#[command(about = "Point-in-time fundamentals ranking and stock selection", long_about = None)]
#[command(version)]
struct Cli {
    /// Pipeline configuration file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Response cache directory, overriding the configuration
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Keep fetched responses in memory only
    #[arg(long, global = true)]
    no_cache: bool,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Align the universe and write the per-period document
    Compose {
        /// Output JSON document
        #[arg(short, long, default_value = "stock_data_by_period.json")]
        output: PathBuf,

        /// Also write the per-ticker aligned rows as CSV
        #[arg(long)]
        aligned_csv: Option<PathBuf>,
    },

    /// Show the per-metric rank tables of every period
    Rank {
        /// Read the cross-section from a document instead of composing it
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Write the rankings as JSON instead of printing them
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Select the top tickers of every period
    Select {
        /// Read the cross-section from a document instead of composing it
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output CSV file
        #[arg(short, long, default_value = "selections.csv")]
        output: PathBuf,

        /// Tickers per period, overriding the configuration
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Evaluate the lagged portfolio and summarize its performance
    Evaluate {
        /// Read the cross-section from a document instead of composing it
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Tickers per period, overriding the configuration
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info,prime=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(&cli)?;

    match cli.command {
        Commands::Compose {
            output,
            aligned_csv,
        } => {
            let model = online_model(&cli.cache_dir, cli.no_cache, config)?;
            cmd::compose::compose(&model, &output, aligned_csv.as_deref())?;
        }
        Commands::Rank { input, output } => {
            let (model, cross_section) =
                model_and_input(&cli.cache_dir, cli.no_cache, config, input)?;
            cmd::rank::rank(&model, &cross_section, output.as_deref())?;
        }
        Commands::Select {
            input,
            output,
            top_k,
        } => {
            if let Some(k) = top_k {
                config.top_k = k;
            }
            let (model, cross_section) =
                model_and_input(&cli.cache_dir, cli.no_cache, config, input)?;
            cmd::select::select(&model, &cross_section, &output)?;
        }
        Commands::Evaluate {
            input,
            top_k,
            format,
        } => {
            if let Some(k) = top_k {
                config.top_k = k;
            }
            let model = online_model(&cli.cache_dir, cli.no_cache, config)?;
            let cross_section = match input {
                Some(path) => read_input(&path)?,
                None => model.compose_stock_data_by_period()?,
            };
            cmd::evaluate::evaluate(&model, &cross_section, &format)?;
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<PipelineConfig> {
    let config = match &cli.config {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    Ok(config)
}

/// A model backed by the FMP API, with return windows memoized in the cache.
fn online_model(
    cache_dir: &Option<PathBuf>,
    no_cache: bool,
    mut config: PipelineConfig,
) -> Result<PrimeModel<Box<dyn MetricProvider>>> {
    if let Some(dir) = cache_dir {
        config.cache_dir = Some(dir.clone());
    }
    if no_cache {
        config.cache_dir = None;
    }

    let provider: Box<dyn MetricProvider> = match &config.cache_dir {
        Some(dir) => {
            let cache = FileCache::new(dir)
                .with_context(|| format!("opening cache directory {}", dir.display()))?;
            info!(dir = %dir.display(), "using on-disk cache");
            let fmp = FmpProvider::from_env(cache.clone())?
                .with_price_history_from(config.price_history_from);
            Box::new(CachedReturns::new(fmp, cache))
        }
        None => {
            let fmp = FmpProvider::from_env(MemoryCache::new())?
                .with_price_history_from(config.price_history_from);
            Box::new(CachedReturns::new(fmp, MemoryCache::new()))
        }
    };

    Ok(PrimeModel::new(provider, config)?)
}

/// Ranking and selection never query the provider, so a document input needs no API key.
fn model_and_input(
    cache_dir: &Option<PathBuf>,
    no_cache: bool,
    config: PipelineConfig,
    input: Option<PathBuf>,
) -> Result<(PrimeModel<Box<dyn MetricProvider>>, CrossSection)> {
    match input {
        Some(path) => {
            let provider: Box<dyn MetricProvider> = Box::new(StaticProvider::new());
            Ok((PrimeModel::new(provider, config)?, read_input(&path)?))
        }
        None => {
            let model = online_model(cache_dir, no_cache, config)?;
            let cross_section = model.compose_stock_data_by_period()?;
            Ok((model, cross_section))
        }
    }
}

fn read_input(path: &std::path::Path) -> Result<CrossSection> {
    export::read_cross_section(path)
        .with_context(|| format!("reading cross-section from {}", path.display()))
}
