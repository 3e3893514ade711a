//! Crawl coordinator - fans categories out to concurrent crawl tasks
//!
//! This module contains the run-level orchestration:
//! - Pairing categories with proxies by position
//! - Opening every proxy session before any request is sent
//! - Spawning one task per category and joining them in input order

use crate::crawler::category::{crawl_category, Assignment, CatalogQuery, CrawlResult};
use crate::crawler::fetcher::PageFetcher;
use crate::{ConfigError, HarvestError};
use std::sync::Arc;

/// Pairs `category_ids[i]` with `proxies[i]`
///
/// Proxies beyond the number of categories are ignored.
///
/// # Returns
///
/// * `Ok(Vec<Assignment>)` - One assignment per category, in input order
/// * `Err(ConfigError::InsufficientProxies)` - Fewer proxies than categories
pub fn assign(category_ids: &[String], proxies: &[String]) -> Result<Vec<Assignment>, ConfigError> {
    if proxies.len() < category_ids.len() {
        return Err(ConfigError::InsufficientProxies {
            categories: category_ids.len(),
            proxies: proxies.len(),
        });
    }

    Ok(category_ids
        .iter()
        .zip(proxies)
        .map(|(category_id, proxy)| Assignment {
            category_id: category_id.clone(),
            proxy: proxy.clone(),
        })
        .collect())
}

/// Runs every category crawl of a harvest concurrently
pub struct Coordinator<F: PageFetcher> {
    fetcher: Arc<F>,
    query: Arc<CatalogQuery>,
}

impl<F: PageFetcher> Coordinator<F> {
    pub fn new(fetcher: F, query: CatalogQuery) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            query: Arc::new(query),
        }
    }

    /// Crawls all categories and returns their results in input order
    ///
    /// Configuration problems (too few proxies, an unusable proxy) are
    /// reported before any page is requested. Once the crawls are running,
    /// nothing one category does affects another.
    pub async fn run(
        &self,
        category_ids: &[String],
        proxies: &[String],
    ) -> Result<Vec<CrawlResult>, HarvestError> {
        let assignments = assign(category_ids, proxies)?;

        let sessions = assignments
            .iter()
            .map(|a| self.fetcher.open_session(&a.proxy))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!("Starting {} category crawls", assignments.len());

        let handles: Vec<_> = assignments
            .into_iter()
            .zip(sessions)
            .map(|(assignment, session)| {
                let fetcher = Arc::clone(&self.fetcher);
                let query = Arc::clone(&self.query);
                let task_assignment = assignment.clone();
                let handle = tokio::spawn(async move {
                    crawl_category(fetcher.as_ref(), &session, &task_assignment, &query).await
                });
                (assignment, handle)
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for (assignment, handle) in handles {
            let result = match handle.await {
                Ok(Ok(result)) => result,
                Ok(Err(e)) => {
                    tracing::error!("Crawl of category {} failed: {}", assignment.category_id, e);
                    CrawlResult::aborted(assignment, e.to_string())
                }
                Err(e) => {
                    tracing::error!("Crawl task for category {} died: {}", assignment.category_id, e);
                    CrawlResult::aborted(assignment, e.to_string())
                }
            };
            results.push(result);
        }

        Ok(results)
    }
}
