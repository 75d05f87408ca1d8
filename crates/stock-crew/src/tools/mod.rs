//! Tools bound to the stock agents

pub mod finance;
pub mod search;

pub use finance::{FinanceDataTool, FinancialSnapshot};
pub use search::StockNewsTool;

use crate::api::{DuckDuckGoClient, QuoteSource, SearchBackend, YahooQuoteSource};
use crate::cache::StockCache;
use crate::config::StockConfig;
use crate::error::Result;
use crew_tools::Tool;
use std::sync::Arc;

/// The news and finance tools, sharing one configuration
#[derive(Clone)]
pub struct StockToolkit {
    pub news: Arc<dyn Tool>,
    pub finance: Arc<dyn Tool>,
}

impl StockToolkit {
    /// Build tools over arbitrary data sources
    pub fn new(
        search: Arc<dyn SearchBackend>,
        quotes: Arc<dyn QuoteSource>,
        config: &StockConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            news: Arc::new(StockNewsTool::new(
                search,
                StockCache::new("news", config.cache_ttl_news),
                config.search_max_results,
            )),
            finance: Arc::new(FinanceDataTool::new(
                quotes,
                StockCache::new("price", config.cache_ttl_quote),
                StockCache::new("key_statistics", config.cache_ttl_fundamental),
            )),
        })
    }

    /// Build tools over DuckDuckGo and Yahoo Finance
    pub fn live(config: &StockConfig) -> Result<Self> {
        Self::new(
            Arc::new(DuckDuckGoClient::new(config)?),
            Arc::new(YahooQuoteSource::new(config)?),
            config,
        )
    }
}
