//! DuckDuckGo web search
//!
//! Scrapes the no-JavaScript HTML endpoint; no API key is needed.

use crate::config::StockConfig;
use crate::error::{Result, StockError};
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::debug;
use url::Url;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Default HTML search endpoint
pub const DUCKDUCKGO_HTML_URL: &str = "https://html.duckduckgo.com/html/";

/// One search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// A web search service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Search and return at most `max_results` hits
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>>;
}

/// DuckDuckGo HTML client with rate limiting
pub struct DuckDuckGoClient {
    client: Client,
    endpoint: Url,
    rate_limiter: SharedRateLimiter,
    parser: ResultParser,
}

impl DuckDuckGoClient {
    /// Create a client from the stock configuration
    pub fn new(config: &StockConfig) -> Result<Self> {
        let per_minute = NonZeroU32::new(config.search_rate_limit).ok_or_else(|| {
            StockError::ConfigError("search_rate_limit must be greater than 0".to_string())
        })?;

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout)
            .build()?;

        let endpoint = Url::parse(DUCKDUCKGO_HTML_URL)
            .map_err(|e| StockError::ConfigError(format!("Invalid search endpoint: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            rate_limiter: Arc::new(RateLimiter::direct(Quota::per_minute(per_minute))),
            parser: ResultParser::new()?,
        })
    }
}

#[async_trait]
impl SearchBackend for DuckDuckGoClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        self.rate_limiter.until_ready().await;
        debug!(query = %query, "DuckDuckGo search");

        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("q", query)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StockError::ApiError {
                service: "DuckDuckGo",
                status: status.as_u16(),
            });
        }

        let html = response.text().await?;
        let hits = self.parser.parse(&html, max_results);
        if hits.is_empty() && is_bot_challenge(&html) {
            return Err(StockError::SearchError(
                "DuckDuckGo answered with a bot challenge instead of results".to_string(),
            ));
        }
        Ok(hits)
    }
}

/// Extracts results from the HTML result page, one `.result` block at a time
struct ResultParser {
    result: Selector,
    title: Selector,
    snippet: Selector,
}

impl ResultParser {
    fn new() -> Result<Self> {
        let build = |css: &str| {
            Selector::parse(css)
                .map_err(|e| StockError::ConfigError(format!("Invalid selector '{css}': {e}")))
        };
        Ok(Self {
            result: build(".result")?,
            title: build("a.result__a")?,
            snippet: build(".result__snippet")?,
        })
    }

    /// Blocks without a title link (ads, notices) are skipped; a missing
    /// snippet yields an empty string
    fn parse(&self, html: &str, max_results: usize) -> Vec<SearchHit> {
        let document = Html::parse_document(html);
        document
            .select(&self.result)
            .filter_map(|block| {
                let link = block.select(&self.title).next()?;
                let href = link.value().attr("href")?;
                Some(SearchHit {
                    url: resolve_link(href),
                    title: text_of(link),
                    snippet: block
                        .select(&self.snippet)
                        .next()
                        .map(text_of)
                        .unwrap_or_default(),
                })
            })
            .filter(|hit| !hit.title.is_empty())
            .take(max_results)
            .collect()
    }
}

/// Element text with whitespace runs collapsed
fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// DuckDuckGo serves this page (HTTP 200) when it throttles scrapers
fn is_bot_challenge(html: &str) -> bool {
    html.contains("anomaly-modal") || html.contains("challenge-form")
}

/// Result links go through a `/l/?uddg=<target>` redirect; return the target
fn resolve_link(href: &str) -> String {
    let absolute = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_string()
    };

    Url::parse(&absolute)
        .ok()
        .and_then(|url| {
            url.query_pairs()
                .find(|(key, _)| key == "uddg")
                .map(|(_, target)| target.into_owned())
        })
        .unwrap_or(absolute)
}
