//! Single-category pagination loop
//!
//! A category is walked page by page through its bound proxy. Page `n + 1` is
//! only requested once every item of page `n` has been normalized.

use crate::catalog::{normalize, Record};
use crate::config::ApiConfig;
use crate::crawler::fetcher::{PageFetcher, PageRequest};
use crate::state::CrawlState;
use crate::HarvestError;

/// Request parameters shared by every category in a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub city_id: String,
    pub viewport: String,
}

impl CatalogQuery {
    pub fn from_api(api: &ApiConfig) -> Self {
        Self {
            city_id: api.city_id.clone(),
            viewport: api.viewport.clone(),
        }
    }
}

/// A category paired with the proxy it is crawled through
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub category_id: String,
    pub proxy: String,
}

/// How a category crawl ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// A page came back with no products
    Exhausted,

    /// A page could not be fetched; treated as the end of the category
    FetchFailed { page: u32, cause: String },

    /// An item on `page` could not be normalized
    Malformed { page: u32, error: String },

    /// The crawl task itself did not complete
    Aborted { reason: String },
}

impl CrawlOutcome {
    /// The terminal state this outcome corresponds to
    pub fn state(&self) -> CrawlState {
        match self {
            Self::Exhausted | Self::FetchFailed { .. } => CrawlState::Exhausted,
            Self::Malformed { .. } | Self::Aborted { .. } => CrawlState::Failed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exhausted => "exhausted",
            Self::FetchFailed { .. } => "fetch_failed",
            Self::Malformed { .. } => "malformed",
            Self::Aborted { .. } => "aborted",
        }
    }
}

/// Everything one category crawl produced
#[derive(Debug, Clone)]
pub struct CrawlResult {
    pub category_id: String,
    pub proxy: String,
    /// Records in page order, then in the order the page listed them
    pub records: Vec<Record>,
    /// Number of page requests issued, including the final empty or failed one
    pub pages_requested: u32,
    pub outcome: CrawlOutcome,
}

impl CrawlResult {
    /// A result for a category whose task never reported back
    pub fn aborted(assignment: Assignment, reason: String) -> Self {
        Self {
            category_id: assignment.category_id,
            proxy: assignment.proxy,
            records: Vec::new(),
            pages_requested: 0,
            outcome: CrawlOutcome::Aborted { reason },
        }
    }

    pub fn state(&self) -> CrawlState {
        self.outcome.state()
    }
}

/// Crawls one category until it is exhausted or a payload is malformed
///
/// Fetch failures and malformed items both end the crawl; the records
/// gathered up to that point are kept.
pub async fn crawl_category<F: PageFetcher>(
    fetcher: &F,
    session: &F::Session,
    assignment: &Assignment,
    query: &CatalogQuery,
) -> Result<CrawlResult, HarvestError> {
    let category_id = assignment.category_id.as_str();
    let proxy = assignment.proxy.as_str();

    let mut state = CrawlState::initial();
    let mut records = Vec::new();
    let mut pages_requested = 0;
    let mut outcome = CrawlOutcome::Exhausted;

    while let Some(page) = state.page() {
        tracing::info!(
            "Crawling category {}, page {} via proxy {}",
            category_id,
            page,
            proxy
        );

        let request = PageRequest {
            category_id,
            city_id: &query.city_id,
            page_number: page,
            viewport: &query.viewport,
        };
        pages_requested += 1;

        let items = match fetcher.fetch_page(session, &request).await {
            Ok(items) => items,
            Err(failure) => {
                tracing::warn!("Category {}, page {}: {}", category_id, page, failure);
                outcome = CrawlOutcome::FetchFailed {
                    page,
                    cause: failure.cause.to_string(),
                };
                state = state.exhaust()?;
                continue;
            }
        };

        if items.is_empty() {
            tracing::debug!("Category {} exhausted at page {}", category_id, page);
            state = state.exhaust()?;
            continue;
        }

        let mut malformed = None;
        for item in &items {
            match normalize(item) {
                Ok(record) => records.push(record),
                Err(e) => {
                    malformed = Some(e);
                    break;
                }
            }
        }

        state = match malformed {
            Some(e) => {
                tracing::error!(
                    "Category {}, page {}: {}; keeping {} records",
                    category_id,
                    page,
                    e,
                    records.len()
                );
                outcome = CrawlOutcome::Malformed {
                    page,
                    error: e.to_string(),
                };
                state.fail()?
            }
            None => state.advance()?,
        };
    }

    tracing::debug!(
        "Category {} finished ({}) with {} records from {} requests",
        category_id,
        outcome.as_str(),
        records.len(),
        pages_requested
    );

    Ok(CrawlResult {
        category_id: category_id.to_string(),
        proxy: proxy.to_string(),
        records,
        pages_requested,
        outcome,
    })
}
