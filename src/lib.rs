//! Catalog Harvester: a proxied, multi-category catalog crawler
//!
//! This crate walks the paginated product listing of an e-commerce catalog API,
//! one independent crawl per category, each bound to its own proxy, and writes
//! the normalized products as line-delimited JSON.

pub mod catalog;
pub mod config;
pub mod crawler;
pub mod input;
pub mod output;
pub mod state;

use thiserror::Error;

/// Main error type for Catalog Harvester operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read {path}: {source}")]
    Input {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Output {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlState,
        to: state::CrawlState,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Not enough proxies: {categories} categories but only {proxies} proxies")]
    InsufficientProxies { categories: usize, proxies: usize },

    #[error("Invalid proxy '{proxy}': {source}")]
    InvalidProxy {
        proxy: String,
        source: reqwest::Error,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Result type alias for Catalog Harvester operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use catalog::{normalize, NormalizeError, Record};
pub use config::Config;
pub use crawler::{Coordinator, CrawlOutcome, CrawlResult, FetchFailure, HttpFetcher};
pub use state::CrawlState;
