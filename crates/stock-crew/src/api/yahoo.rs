//! Yahoo Finance client
//!
//! Prices come from the chart API and PER, EPS and beta from the
//! crumb-authenticated quote summary, both through `yahoo_finance_api`.

use crate::config::StockConfig;
use crate::error::{Result, StockError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;
use yahoo_finance_api as yahoo;

/// Valuation and risk figures; each may be missing upstream
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyStatistics {
    /// Trailing price/earnings ratio
    pub pe: Option<f64>,
    /// Trailing earnings per share
    pub eps: Option<f64>,
    /// Beta against the market
    pub beta: Option<f64>,
}

/// A finance data service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Latest price
    async fn price(&self, ticker: &str) -> Result<f64>;

    /// PER, EPS and beta
    async fn key_statistics(&self, ticker: &str) -> Result<KeyStatistics>;
}

/// Yahoo Finance quote source
///
/// One connector is shared so the session cookie and crumb are fetched once
/// and refreshed by the connector when Yahoo rejects them.
pub struct YahooQuoteSource {
    connector: Mutex<yahoo::YahooConnector>,
}

impl YahooQuoteSource {
    /// Create a source from the stock configuration
    pub fn new(config: &StockConfig) -> Result<Self> {
        let connector = yahoo::YahooConnector::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| StockError::YahooFinanceError(e.to_string()))?;
        Ok(Self {
            connector: Mutex::new(connector),
        })
    }
}

#[async_trait]
impl QuoteSource for YahooQuoteSource {
    async fn price(&self, ticker: &str) -> Result<f64> {
        check_ticker(ticker)?;
        let response = self
            .connector
            .lock()
            .await
            .get_latest_quotes(ticker, "1d")
            .await
            .map_err(|e| StockError::YahooFinanceError(e.to_string()))?;

        let quote = response
            .last_quote()
            .map_err(|e| StockError::YahooFinanceError(e.to_string()))?;

        debug!(ticker = %ticker, close = quote.close, "Fetched latest quote");
        Ok(quote.close)
    }

    async fn key_statistics(&self, ticker: &str) -> Result<KeyStatistics> {
        check_ticker(ticker)?;
        let summary = self
            .connector
            .lock()
            .await
            .get_ticker_info(ticker)
            .await
            .map_err(|e| StockError::YahooFinanceError(e.to_string()))?;

        let stats = key_statistics_from(&summary)?;
        debug!(ticker = %ticker, ?stats, "Fetched key statistics");
        Ok(stats)
    }
}

/// Yahoo symbols are letters, digits and `.-^=` (`005930.KS`, `^GSPC`, `KRW=X`);
/// anything else would change the request URL
fn check_ticker(ticker: &str) -> Result<()> {
    let valid = !ticker.is_empty()
        && ticker
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='));
    if valid {
        Ok(())
    } else {
        Err(StockError::InvalidInput(format!("Invalid ticker '{ticker}'")))
    }
}

/// Pull PER, EPS and beta out of a quote summary
fn key_statistics_from(summary: &yahoo::YQuoteSummary) -> Result<KeyStatistics> {
    let data = summary
        .quote_summary
        .as_ref()
        .and_then(|quote_summary| quote_summary.result.as_ref())
        .and_then(|results| results.first())
        .ok_or_else(|| {
            let reason = summary
                .finance
                .as_ref()
                .and_then(|finance| finance.error.as_ref())
                .or_else(|| {
                    summary
                        .quote_summary
                        .as_ref()
                        .and_then(|quote_summary| quote_summary.error.as_ref())
                })
                .and_then(|error| error.description.clone().or_else(|| error.code.clone()))
                .unwrap_or_else(|| "empty quote summary".to_string());
            StockError::YahooFinanceError(reason)
        })?;

    let detail = data.summary_detail.as_ref();
    let key_stats = data.default_key_statistics.as_ref();

    Ok(KeyStatistics {
        pe: detail.and_then(|d| d.trailing_pe).filter(|pe| pe.is_finite() && *pe < f64::MAX),
        eps: key_stats.and_then(|k| k.trailing_eps),
        beta: detail.and_then(|d| d.beta).or_else(|| key_stats.and_then(|k| k.beta)),
    })
}
