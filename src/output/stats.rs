//! Run statistics
//!
//! Summarizes a finished harvest per category and in total, for the final log
//! lines of a run.

use crate::crawler::CrawlResult;
use chrono::{DateTime, Utc};

/// What one category contributed to the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryStatistics {
    pub category_id: String,
    pub proxy: String,
    pub records: usize,
    pub pages_requested: u32,
    /// Outcome name (`exhausted`, `fetch_failed`, `malformed`, `aborted`)
    pub outcome: &'static str,
}

/// Harvest run summary
#[derive(Debug, Clone)]
pub struct HarvestStatistics {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub categories: Vec<CategoryStatistics>,
    pub total_records: usize,
    pub total_requests: u64,
}

impl HarvestStatistics {
    /// Builds the summary from results in category order
    pub fn from_results(
        results: &[CrawlResult],
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        let categories: Vec<CategoryStatistics> = results
            .iter()
            .map(|r| CategoryStatistics {
                category_id: r.category_id.clone(),
                proxy: r.proxy.clone(),
                records: r.records.len(),
                pages_requested: r.pages_requested,
                outcome: r.outcome.as_str(),
            })
            .collect();

        let total_records = categories.iter().map(|c| c.records).sum();
        let total_requests = categories.iter().map(|c| c.pages_requested as u64).sum();

        Self {
            started_at,
            finished_at,
            categories,
            total_records,
            total_requests,
        }
    }

    /// Number of categories that ended with the given outcome name
    pub fn count_outcome(&self, outcome: &str) -> usize {
        self.categories
            .iter()
            .filter(|c| c.outcome == outcome)
            .count()
    }

    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}

/// Logs the per-category breakdown and run totals
pub fn log_statistics(stats: &HarvestStatistics) {
    for category in &stats.categories {
        tracing::info!(
            "Category {} via {}: {} records, {} requests, {}",
            category.category_id,
            category.proxy,
            category.records,
            category.pages_requested,
            category.outcome
        );
    }

    tracing::info!(
        "{} categories ({} exhausted, {} fetch failures, {} malformed, {} aborted), {} records, {} requests in {}s",
        stats.categories.len(),
        stats.count_outcome("exhausted"),
        stats.count_outcome("fetch_failed"),
        stats.count_outcome("malformed"),
        stats.count_outcome("aborted"),
        stats.total_records,
        stats.total_requests,
        stats.duration_seconds()
    );
}
