//! Catalog Harvester main entry point
//!
//! This is the command-line interface for the catalog harvester.

use anyhow::Context;
use catalog_harvester::config::{load_config_with_hash, Config};
use catalog_harvester::crawler::{assign, harvest, HttpFetcher, PageFetcher};
use catalog_harvester::input::{load_category_ids, load_proxies};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Catalog Harvester: proxied multi-category catalog crawler
///
/// Crawls every category listed in the input file through its own proxy and
/// writes the normalized products as JSON lines.
#[derive(Parser, Debug)]
#[command(name = "catalog-harvester")]
#[command(version = "1.0.0")]
#[command(about = "Proxied multi-category catalog crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Write records here instead of the configured output path
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Validate config and inputs and show the category/proxy pairing without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if let Some(output) = cli.output {
        config.output.path = output.display().to_string();
    }

    if cli.dry_run {
        handle_dry_run(&config)
    } else {
        handle_harvest(config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("catalog_harvester=info,warn"),
            1 => EnvFilter::new("catalog_harvester=debug,info"),
            2 => EnvFilter::new("catalog_harvester=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles --dry-run: checks inputs and prints which proxy each category would use
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Catalog Harvester Dry Run ===\n");

    println!("Catalog API:");
    println!("  Endpoint: {}", config.api.base_url);
    println!("  City id: {}", config.api.city_id);
    println!("  Viewport: {}", config.api.viewport);
    println!("  Timeout: {}s", config.api.timeout_secs);

    println!("\nOutput:");
    println!("  {}", config.output.path);

    let category_ids = load_category_ids(Path::new(&config.input.categories_path))?;
    let proxies = load_proxies(Path::new(&config.input.proxies_path))?;
    let assignments = assign(&category_ids, &proxies)?;

    // Builds each proxied client without sending anything
    let fetcher = HttpFetcher::new(config.api.clone());
    for assignment in &assignments {
        fetcher.open_session(&assignment.proxy)?;
    }

    println!("\nAssignments ({}):", assignments.len());
    for assignment in &assignments {
        println!("  - {} -> {}", assignment.category_id, assignment.proxy);
    }

    if proxies.len() > category_ids.len() {
        println!(
            "\n  ({} unused proxies)",
            proxies.len() - category_ids.len()
        );
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would crawl {} categories concurrently",
        assignments.len()
    );

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config) -> anyhow::Result<()> {
    match harvest(config).await {
        Ok(stats) => {
            tracing::info!(
                "Harvest completed: {} records from {} categories",
                stats.total_records,
                stats.categories.len()
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
