//! Configuration for the stock data sources

use crate::error::{Result, StockError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound on search results handed to an agent
pub const MAX_SEARCH_RESULTS: usize = 25;

/// Environment variables read by [`StockConfig::from_env`]
pub mod env {
    pub const CACHE_TTL_QUOTE_SECS: &str = "STOCK_CACHE_TTL_QUOTE_SECS";
    pub const CACHE_TTL_FUNDAMENTAL_SECS: &str = "STOCK_CACHE_TTL_FUNDAMENTAL_SECS";
    pub const CACHE_TTL_NEWS_SECS: &str = "STOCK_CACHE_TTL_NEWS_SECS";
    pub const SEARCH_MAX_RESULTS: &str = "STOCK_SEARCH_MAX_RESULTS";
    pub const SEARCH_RATE_LIMIT: &str = "STOCK_SEARCH_RATE_LIMIT";
    pub const REQUEST_TIMEOUT_SECS: &str = "STOCK_REQUEST_TIMEOUT_SECS";
    pub const USER_AGENT: &str = "STOCK_USER_AGENT";
}

/// Settings for the search and finance data sources
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockConfig {
    /// Cache TTL for prices
    pub cache_ttl_quote: Duration,

    /// Cache TTL for PER, EPS and beta
    pub cache_ttl_fundamental: Duration,

    /// Cache TTL for news search results
    pub cache_ttl_news: Duration,

    /// Search results per query
    pub search_max_results: usize,

    /// Search requests allowed per minute
    pub search_rate_limit: u32,

    /// Timeout for every outbound HTTP request
    pub request_timeout: Duration,

    /// User-Agent sent to search and quote endpoints
    pub user_agent: String,
}

impl Default for StockConfig {
    fn default() -> Self {
        Self {
            cache_ttl_quote: Duration::from_secs(60),
            cache_ttl_fundamental: Duration::from_secs(3600),
            cache_ttl_news: Duration::from_secs(300),
            search_max_results: 5,
            search_rate_limit: 20,
            request_timeout: Duration::from_secs(30),
            user_agent: concat!("stock-crew/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl StockConfig {
    /// Create a new configuration builder
    pub fn builder() -> StockConfigBuilder {
        StockConfigBuilder::default()
    }

    /// Defaults overridden by `STOCK_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns, then validated
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parsed<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
            value
                .trim()
                .parse()
                .map_err(|_| StockError::ConfigError(format!("{key}: '{value}' is not a number")))
        }
        let secs = |key: &str, value: &str| parsed::<u64>(key, value).map(Duration::from_secs);

        let mut builder = Self::builder();
        if let Some(v) = lookup(env::CACHE_TTL_QUOTE_SECS) {
            builder = builder.cache_ttl_quote(secs(env::CACHE_TTL_QUOTE_SECS, &v)?);
        }
        if let Some(v) = lookup(env::CACHE_TTL_FUNDAMENTAL_SECS) {
            builder = builder.cache_ttl_fundamental(secs(env::CACHE_TTL_FUNDAMENTAL_SECS, &v)?);
        }
        if let Some(v) = lookup(env::CACHE_TTL_NEWS_SECS) {
            builder = builder.cache_ttl_news(secs(env::CACHE_TTL_NEWS_SECS, &v)?);
        }
        if let Some(v) = lookup(env::SEARCH_MAX_RESULTS) {
            builder = builder.search_max_results(parsed(env::SEARCH_MAX_RESULTS, &v)?);
        }
        if let Some(v) = lookup(env::SEARCH_RATE_LIMIT) {
            builder = builder.search_rate_limit(parsed(env::SEARCH_RATE_LIMIT, &v)?);
        }
        if let Some(v) = lookup(env::REQUEST_TIMEOUT_SECS) {
            builder = builder.request_timeout(secs(env::REQUEST_TIMEOUT_SECS, &v)?);
        }
        if let Some(v) = lookup(env::USER_AGENT).filter(|v| !v.trim().is_empty()) {
            builder = builder.user_agent(v);
        }
        builder.build()
    }

    /// Check limits the data sources rely on
    pub fn validate(&self) -> Result<()> {
        if self.search_max_results == 0 || self.search_max_results > MAX_SEARCH_RESULTS {
            return Err(StockError::ConfigError(format!(
                "search_max_results must be between 1 and {MAX_SEARCH_RESULTS}"
            )));
        }

        if self.search_rate_limit == 0 {
            return Err(StockError::ConfigError(
                "search_rate_limit must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(StockError::ConfigError(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct StockConfigBuilder {
    cache_ttl_quote: Option<Duration>,
    cache_ttl_fundamental: Option<Duration>,
    cache_ttl_news: Option<Duration>,
    search_max_results: Option<usize>,
    search_rate_limit: Option<u32>,
    request_timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl StockConfigBuilder {
    pub fn cache_ttl_quote(mut self, duration: Duration) -> Self {
        self.cache_ttl_quote = Some(duration);
        self
    }

    pub fn cache_ttl_fundamental(mut self, duration: Duration) -> Self {
        self.cache_ttl_fundamental = Some(duration);
        self
    }

    pub fn cache_ttl_news(mut self, duration: Duration) -> Self {
        self.cache_ttl_news = Some(duration);
        self
    }

    pub fn search_max_results(mut self, n: usize) -> Self {
        self.search_max_results = Some(n);
        self
    }

    /// Set search requests per minute
    pub fn search_rate_limit(mut self, per_minute: u32) -> Self {
        self.search_rate_limit = Some(per_minute);
        self
    }

    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Fill unset fields from the defaults and validate
    pub fn build(self) -> Result<StockConfig> {
        let defaults = StockConfig::default();

        let config = StockConfig {
            cache_ttl_quote: self.cache_ttl_quote.unwrap_or(defaults.cache_ttl_quote),
            cache_ttl_fundamental: self
                .cache_ttl_fundamental
                .unwrap_or(defaults.cache_ttl_fundamental),
            cache_ttl_news: self.cache_ttl_news.unwrap_or(defaults.cache_ttl_news),
            search_max_results: self.search_max_results.unwrap_or(defaults.search_max_results),
            search_rate_limit: self.search_rate_limit.unwrap_or(defaults.search_rate_limit),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
        };

        config.validate()?;
        Ok(config)
    }
}
