use std::time::Duration;

use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key, passed as the `api_key` query parameter
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Language requested from TMDB for titles and overviews
    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Number of popular-movie pages fetched to build the corpus
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Pause between successful listing pages, in milliseconds
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,

    /// Timeout for each outbound catalog request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Retries on transient transport failures (timeouts, refused connections)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Recommendations returned when the caller does not ask for a count
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,

    /// Minimum number of distinct liked movies accepted by the recommend endpoints
    #[serde(default = "default_min_liked")]
    pub min_liked: usize,

    /// Upper bound on watchlist entries per user
    #[serde(default = "default_max_watchlist_entries")]
    pub max_watchlist_entries: usize,

    /// Upper bound on distinct users holding a watchlist
    #[serde(default = "default_max_watchlist_users")]
    pub max_watchlist_users: usize,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Highest page count the corpus fetcher will walk
pub const MAX_SUPPORTED_PAGES: u32 = 30;

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_language() -> String {
    "en-US".to_string()
}

fn default_max_pages() -> u32 {
    5
}

fn default_page_delay_ms() -> u64 {
    300
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    2
}

fn default_top_n() -> usize {
    5
}

fn default_min_liked() -> usize {
    5
}

fn default_max_watchlist_entries() -> usize {
    500
}

fn default_max_watchlist_users() -> usize {
    10_000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.tmdb_api_key.trim().is_empty() {
            anyhow::bail!("TMDB_API_KEY must not be empty");
        }
        if self.max_pages == 0 || self.max_pages > MAX_SUPPORTED_PAGES {
            anyhow::bail!(
                "MAX_PAGES must be between 1 and {}, got {}",
                MAX_SUPPORTED_PAGES,
                self.max_pages
            );
        }
        if self.default_top_n == 0 {
            anyhow::bail!("DEFAULT_TOP_N must be at least 1");
        }
        Ok(())
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
