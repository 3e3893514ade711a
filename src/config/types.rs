use serde::Deserialize;

/// City the catalog is browsed from when none is configured (Moscow)
pub const DEFAULT_CITY_ID: &str = "0c5b2444-70a0-4932-980c-b4dc0d3f02b5";

/// Viewport tag sent with every page request when none is configured
pub const DEFAULT_VIEWPORT: &str = "16-46";

/// Desktop browser identification sent when none is configured
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/86.0.4240.198 Safari/537.36";

/// Main configuration structure for Catalog Harvester
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

/// Catalog endpoint and request shaping
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Full URL of the paginated product listing endpoint
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// City whose assortment and prices are requested
    #[serde(rename = "city-id", default = "default_city_id")]
    pub city_id: String,

    /// Value of the fixed `z` query parameter
    #[serde(default = "default_viewport")]
    pub viewport: String,

    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

/// Input list locations
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// File with one category id per line
    #[serde(rename = "categories-path")]
    pub categories_path: String,

    /// File with one proxy descriptor per line
    #[serde(rename = "proxies-path")]
    pub proxies_path: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the JSONL file, overwritten on every run
    pub path: String,
}

impl ApiConfig {
    /// Builds an API config with default request shaping for the given endpoint
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            city_id: default_city_id(),
            viewport: default_viewport(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

fn default_city_id() -> String {
    DEFAULT_CITY_ID.to_string()
}

fn default_viewport() -> String {
    DEFAULT_VIEWPORT.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}
