//! Catalog page fetcher
//!
//! This module handles every HTTP request the harvester makes:
//! - Building one proxied HTTP client per category ("session")
//! - Shaping the paginated catalog query
//! - Classifying failures (status, body, transport) into a [`FetchFailure`]
//!
//! Nothing here retries. A failure is handed back to the category crawler,
//! which treats it as the end of that category.

use crate::config::ApiConfig;
use crate::ConfigError;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Products of one page, or the reason the page could not be read
pub type PageResult = Result<Vec<Value>, FetchFailure>;

/// One paginated catalog request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest<'a> {
    pub category_id: &'a str,
    pub city_id: &'a str,
    /// 1-based page number
    pub page_number: u32,
    pub viewport: &'a str,
}

impl PageRequest<'_> {
    /// Query string parameters, in the order the catalog frontend sends them
    pub fn query(&self) -> [(&'static str, String); 4] {
        [
            ("categoryId", self.category_id.to_string()),
            ("cityId", self.city_id.to_string()),
            ("pageNumber", self.page_number.to_string()),
            ("z", self.viewport.to_string()),
        ]
    }
}

/// Why a page fetch failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchCause {
    #[error("request timeout")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("unexpected response body: {0}")]
    Body(String),

    #[error("{0}")]
    Transport(String),
}

/// A page request that produced no usable product list
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Request via proxy {proxy} failed: {cause}")]
pub struct FetchFailure {
    pub proxy: String,
    pub cause: FetchCause,
}

/// Source of catalog pages
///
/// A session is opened once per (category, proxy) pair before any request is
/// sent, and every page of that category is fetched through it.
pub trait PageFetcher: Send + Sync + 'static {
    type Session: Send + Sync + 'static;

    /// Binds a proxy; an unusable descriptor is a configuration error
    fn open_session(&self, proxy: &str) -> Result<Self::Session, ConfigError>;

    fn fetch_page(
        &self,
        session: &Self::Session,
        request: &PageRequest<'_>,
    ) -> impl Future<Output = PageResult> + Send;
}

/// Expected envelope: `{ "data": { "products": [ ... ] } }`
#[derive(Debug, Deserialize)]
struct CatalogPage {
    data: CatalogData,
}

#[derive(Debug, Deserialize)]
struct CatalogData {
    /// `null` is treated the same as an empty list
    products: Option<Vec<Value>>,
}

/// A reqwest client bound to a single proxy
#[derive(Debug, Clone)]
pub struct ProxySession {
    proxy: String,
    client: Client,
}

impl ProxySession {
    pub fn proxy(&self) -> &str {
        &self.proxy
    }

    fn failure(&self, cause: FetchCause) -> FetchFailure {
        FetchFailure {
            proxy: self.proxy.clone(),
            cause,
        }
    }
}

/// Fetches catalog pages over HTTP through per-category proxies
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    api: ApiConfig,
}

impl HttpFetcher {
    pub fn new(api: ApiConfig) -> Self {
        Self { api }
    }
}

impl PageFetcher for HttpFetcher {
    type Session = ProxySession;

    fn open_session(&self, proxy: &str) -> Result<ProxySession, ConfigError> {
        Ok(ProxySession {
            proxy: proxy.to_string(),
            client: build_http_client(&self.api, proxy)?,
        })
    }

    async fn fetch_page(&self, session: &ProxySession, request: &PageRequest<'_>) -> PageResult {
        let response = session
            .client
            .get(&self.api.base_url)
            .query(&request.query())
            .send()
            .await
            .map_err(|e| session.failure(classify_transport_error(&e)))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(session.failure(FetchCause::Status(status.as_u16())));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| session.failure(classify_transport_error(&e)))?;

        let page: CatalogPage = serde_json::from_slice(&body)
            .map_err(|e| session.failure(FetchCause::Body(e.to_string())))?;

        Ok(page.data.products.unwrap_or_default())
    }
}

/// Builds an HTTP client that routes every request through `proxy`
///
/// A descriptor without a scheme (`host:port` or `user:pass@host:port`) is
/// treated as an HTTP proxy.
pub fn build_http_client(api: &ApiConfig, proxy: &str) -> Result<Client, ConfigError> {
    let proxy_url = if proxy.contains("://") {
        proxy.to_string()
    } else {
        format!("http://{}", proxy)
    };

    let bound = reqwest::Proxy::all(proxy_url.as_str()).map_err(|source| {
        ConfigError::InvalidProxy {
            proxy: proxy.to_string(),
            source,
        }
    })?;

    Client::builder()
        .user_agent(api.user_agent.as_str())
        .timeout(Duration::from_secs(api.timeout_secs))
        .connect_timeout(Duration::from_secs(api.connect_timeout_secs))
        .proxy(bound)
        .gzip(true)
        .brotli(true)
        .build()
        .map_err(ConfigError::Client)
}

fn classify_transport_error(e: &reqwest::Error) -> FetchCause {
    if e.is_timeout() {
        FetchCause::Timeout
    } else if e.is_connect() {
        FetchCause::Connect(e.to_string())
    } else if e.is_decode() || e.is_body() {
        FetchCause::Body(e.to_string())
    } else {
        FetchCause::Transport(e.to_string())
    }
}
