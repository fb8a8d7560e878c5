use alpha_agents::{AlphaConfig, AlphaCoordinator, TraderFilters};
use anyhow::{Context, Result};
use clap::Parser;
use common::{DateTime, MarketData, TraderData, Utc};
use std::path::{Path, PathBuf};
use tracing::{info, Level};

/// Decide whether a prediction market shows alpha from its traders' behaviour.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Market snapshot JSON file.
    #[arg(long, required_unless_present_any = ["print_config_template", "write_config"])]
    market: Option<PathBuf>,

    /// JSON array of trader records.
    #[arg(long, required_unless_present_any = ["print_config_template", "write_config"])]
    traders: Option<PathBuf>,

    /// TOML configuration file; ALPHA_* environment variables override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Trader filter overrides as JSON.
    #[arg(long)]
    filters: Option<PathBuf>,

    /// Override the analysis deadline in milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Evaluate as of this RFC 3339 timestamp instead of now.
    #[arg(long)]
    as_of: Option<DateTime<Utc>>,

    /// Print single-line JSON.
    #[arg(long)]
    compact: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,

    /// Print a commented configuration template and exit.
    #[arg(long)]
    print_config_template: bool,

    /// Write the effective configuration as TOML to this path and exit.
    #[arg(long)]
    write_config: Option<PathBuf>,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} file {}", what, path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {} file {}", what, path.display()))
}

fn build_config(cli: &Cli) -> Result<AlphaConfig> {
    let mut config = AlphaConfig::load(cli.config.as_deref())?;
    if let Some(timeout_ms) = cli.timeout_ms {
        config.analysis_timeout_ms = timeout_ms;
        config.validate()?;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_config_template {
        print!("{}", alpha_agents::config::config_template());
        return Ok(());
    }

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    let config = build_config(&cli)?;

    if let Some(path) = cli.write_config.as_deref() {
        alpha_agents::config::save_config(&config, path)?;
        info!(path = %path.display(), "Configuration written");
        return Ok(());
    }

    let market_path = cli.market.as_deref().context("--market is required")?;
    let traders_path = cli.traders.as_deref().context("--traders is required")?;
    let market: MarketData = read_json(market_path, "market")?;
    let traders: Vec<TraderData> = read_json(traders_path, "traders")?;
    let filters: Option<TraderFilters> = match cli.filters.as_deref() {
        Some(path) => Some(read_json(path, "filters")?),
        None => None,
    };

    info!(
        market = %market_path.display(),
        traders = traders.len(),
        "Loaded input"
    );

    let coordinator = AlphaCoordinator::new(config)?;
    let as_of = cli.as_of.unwrap_or_else(Utc::now);
    let verdict = coordinator
        .analyze_market_at(market, traders, filters, as_of)
        .await?;

    let output = if cli.compact {
        serde_json::to_string(&verdict)?
    } else {
        serde_json::to_string_pretty(&verdict)?
    };
    println!("{}", output);

    Ok(())
}
