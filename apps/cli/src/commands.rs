//! CLI definition, tracing setup, and the crawl command.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;

use ariacrawl_core::{CrawlSources, crawl_aria, to_pretty_json};
use ariacrawl_crawler::CachedFetcher;
use ariacrawl_shared::{AppConfig, CacheMode, FetchConfig, load_config, load_config_from};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// ariacrawl — extract ARIA roles, states, properties, and value types from
/// the W3C specifications as JSON.
#[derive(Parser, Debug)]
#[command(
    name = "ariacrawl",
    version,
    about = "Extract ARIA roles, states, properties, and value types from the W3C specs as JSON.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Config file to use instead of ~/.ariacrawl/ariacrawl.toml.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Serve both documents from the response cache; never touch the network.
    #[arg(long)]
    pub offline: bool,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Log output format.
#[derive(Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr; stdout carries
/// only the JSON document.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "ariacrawl=info",
        1 => "ariacrawl=debug",
        _ => "ariacrawl=trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// Resolve config and CLI overrides into the runtime fetch config.
fn fetch_config(config: &AppConfig, offline: bool) -> FetchConfig {
    let mut fetch = FetchConfig::from(config);
    if offline {
        fetch.cache_mode = CacheMode::OnlyIfCached;
    }
    fetch
}

/// Crawl both documents and print the aggregated JSON to stdout.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => load_config_from(path)
            .wrap_err_with(|| format!("loading config from {}", path.display()))?,
        None => load_config()?,
    };

    let sources = CrawlSources::from_config(&config.sources)?;
    let fetch = fetch_config(&config, cli.offline);
    info!(cache_dir = %fetch.cache_dir.display(), "using response cache");

    let fetcher = CachedFetcher::new(fetch)?;
    let data = crawl_aria(&fetcher, &sources).await.wrap_err("ARIA crawl failed")?;

    println!("{}", to_pretty_json(&data)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_flags() {
        let cli = Cli::parse_from([
            "ariacrawl",
            "--config",
            "/tmp/ariacrawl.toml",
            "--offline",
            "--log-format",
            "json",
            "-vv",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/ariacrawl.toml")));
        assert!(cli.offline);
        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn offline_forces_cache_only() {
        let config = AppConfig::default();
        assert_eq!(fetch_config(&config, false).cache_mode, CacheMode::Default);
        assert_eq!(fetch_config(&config, true).cache_mode, CacheMode::OnlyIfCached);
    }
}
