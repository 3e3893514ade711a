//! Crawler module for catalog pagination
//!
//! This module contains the core harvesting logic, including:
//! - Proxied HTTP fetching of catalog pages
//! - The per-category pagination loop
//! - Concurrent coordination of all categories in a run

mod category;
mod coordinator;
mod fetcher;

pub use category::{crawl_category, Assignment, CatalogQuery, CrawlOutcome, CrawlResult};
pub use coordinator::{assign, Coordinator};
pub use fetcher::{
    build_http_client, FetchCause, FetchFailure, HttpFetcher, PageFetcher, PageRequest,
    PageResult, ProxySession,
};

use crate::config::Config;
use crate::input::{load_category_ids, load_proxies};
use crate::output::{log_statistics, write_jsonl, HarvestStatistics};
use crate::HarvestError;
use chrono::Utc;
use std::path::Path;

/// Runs a complete harvest
///
/// This is the main entry point for a run. It will:
/// 1. Load the category and proxy lists
/// 2. Crawl every category concurrently through its proxy
/// 3. Write all records to the output file, category order preserved
/// 4. Log per-category and total statistics
///
/// # Returns
///
/// * `Ok(HarvestStatistics)` - The run finished and the output was written
/// * `Err(HarvestError)` - Inputs, configuration or output failed
pub async fn harvest(config: Config) -> Result<HarvestStatistics, HarvestError> {
    let started_at = Utc::now();

    let category_ids = load_category_ids(Path::new(&config.input.categories_path))?;
    let proxies = load_proxies(Path::new(&config.input.proxies_path))?;
    tracing::info!(
        "Loaded {} categories and {} proxies",
        category_ids.len(),
        proxies.len()
    );

    let query = CatalogQuery::from_api(&config.api);
    let coordinator = Coordinator::new(HttpFetcher::new(config.api), query);
    let results = coordinator.run(&category_ids, &proxies).await?;

    let output_path = Path::new(&config.output.path);
    let written = write_jsonl(output_path, &results)?;

    let stats = HarvestStatistics::from_results(&results, started_at, Utc::now());
    log_statistics(&stats);
    tracing::info!(
        "Harvest finished: {} records saved to {}",
        written,
        output_path.display()
    );

    Ok(stats)
}
