//! Price and key-statistics tool

use crate::api::{KeyStatistics, QuoteSource};
use crate::cache::StockCache;
use async_trait::async_trait;
use crew_core::{Error, Result};
use crew_llm::tools::schema;
use crew_tools::Tool;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{info, warn};

/// Price and valuation figures for one ticker
///
/// A field is `None` when its upstream fetch failed; the tool never fails
/// for data reasons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialSnapshot {
    pub price: Option<f64>,
    pub pe: Option<f64>,
    pub eps: Option<f64>,
    pub beta: Option<f64>,
}

impl FinancialSnapshot {
    /// Whether every field is missing
    pub fn is_empty(&self) -> bool {
        self.price.is_none() && self.pe.is_none() && self.eps.is_none() && self.beta.is_none()
    }
}

/// `finance_data`: `{ price, pe, eps, beta }` for a ticker
pub struct FinanceDataTool {
    source: Arc<dyn QuoteSource>,
    quotes: StockCache<f64>,
    fundamentals: StockCache<KeyStatistics>,
}

#[derive(Debug, Deserialize)]
struct FinanceParams {
    ticker: String,
}

impl FinanceDataTool {
    /// Prices are cached in `quotes`, PER/EPS/beta in `fundamentals`
    pub fn new(
        source: Arc<dyn QuoteSource>,
        quotes: StockCache<f64>,
        fundamentals: StockCache<KeyStatistics>,
    ) -> Self {
        Self {
            source,
            quotes,
            fundamentals,
        }
    }

    /// Fetch a snapshot, degrading failed sub-fetches to `None`
    ///
    /// Only successful sub-fetches are cached, so a transient failure is
    /// retried on the next call.
    pub async fn snapshot(&self, ticker: &str) -> FinancialSnapshot {
        let price = match self
            .quotes
            .get_or_fetch(ticker, || self.source.price(ticker))
            .await
        {
            Ok(price) => Some(price),
            Err(e) => {
                warn!(ticker = %ticker, error = %e, "Price unavailable");
                None
            }
        };

        let stats = match self
            .fundamentals
            .get_or_fetch(ticker, || self.source.key_statistics(ticker))
            .await
        {
            Ok(stats) => stats,
            Err(e) => {
                warn!(ticker = %ticker, error = %e, "Key statistics unavailable");
                KeyStatistics::default()
            }
        };

        let snapshot = FinancialSnapshot {
            price,
            pe: stats.pe,
            eps: stats.eps,
            beta: stats.beta,
        };
        info!(ticker = %ticker, ?snapshot, "Finance snapshot");
        snapshot
    }
}

#[async_trait]
impl Tool for FinanceDataTool {
    async fn execute(&self, params: Value) -> Result<Value> {
        let params: FinanceParams = serde_json::from_value(params)
            .map_err(|e| Error::tool(self.name(), format!("Invalid parameters: {e}")))?;
        let ticker = params.ticker.trim().to_uppercase();
        if ticker.is_empty() {
            return Err(Error::tool(self.name(), "ticker must not be empty"));
        }

        let snapshot = self.snapshot(&ticker).await;
        serde_json::to_value(snapshot).map_err(|e| Error::tool(self.name(), e.to_string()))
    }

    fn name(&self) -> &'static str {
        "finance_data"
    }

    fn description(&self) -> &'static str {
        "주식 가격과 재무 지표를 가져옵니다. 현재가(price), PER(pe), EPS(eps), 베타(beta)를 반환하며 구할 수 없는 값은 null입니다."
    }

    fn input_schema(&self) -> Value {
        schema::object(
            json!({ "ticker": schema::string("Yahoo Finance 티커 (예: AAPL, 005930.KS)") }),
            &["ticker"],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::yahoo::MockQuoteSource;
    use crate::error::StockError;
    use std::time::Duration;

    fn tool(source: MockQuoteSource) -> FinanceDataTool {
        FinanceDataTool::new(
            Arc::new(source),
            StockCache::new("price", Duration::from_secs(60)),
            StockCache::new("key_statistics", Duration::from_secs(3600)),
        )
    }

    fn full_stats() -> KeyStatistics {
        KeyStatistics {
            pe: Some(31.2),
            eps: Some(6.08),
            beta: Some(1.24),
        }
    }

    #[tokio::test]
    async fn test_full_snapshot_is_cached() {
        let mut source = MockQuoteSource::new();
        source
            .expect_price()
            .withf(|ticker| ticker == "AAPL")
            .times(1)
            .returning(|_| Ok(189.5));
        source
            .expect_key_statistics()
            .times(1)
            .returning(|_| Ok(full_stats()));
        let tool = tool(source);

        let out = tool.execute(json!({ "ticker": "aapl" })).await.unwrap();
        assert_eq!(out, json!({ "price": 189.5, "pe": 31.2, "eps": 6.08, "beta": 1.24 }));

        let again = tool.execute(json!({ "ticker": "AAPL" })).await.unwrap();
        assert_eq!(out, again);
    }

    #[tokio::test]
    async fn test_failures_become_null() {
        let mut source = MockQuoteSource::new();
        source
            .expect_price()
            .returning(|_| Err(StockError::YahooFinanceError("no quotes".to_string())));
        source
            .expect_key_statistics()
            .returning(|_| Err(StockError::YahooFinanceError("401".to_string())));

        let out = tool(source).execute(json!({ "ticker": "AAPL" })).await.unwrap();
        assert_eq!(out, json!({ "price": null, "pe": null, "eps": null, "beta": null }));
    }

    #[tokio::test]
    async fn test_failed_part_is_retried() {
        let mut source = MockQuoteSource::new();
        source.expect_price().times(1).returning(|_| Ok(71_000.0));
        source
            .expect_key_statistics()
            .times(2)
            .returning(|_| Err(StockError::YahooFinanceError("timeout".to_string())));
        let tool = tool(source);

        let first = tool.snapshot("005930.KS").await;
        assert_eq!(first.price, Some(71_000.0));
        assert!(first.pe.is_none());
        assert!(!first.is_empty());
        tool.snapshot("005930.KS").await;
    }

    #[tokio::test]
    async fn test_empty_ticker_rejected() {
        let err = tool(MockQuoteSource::new())
            .execute(json!({ "ticker": "  " }))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ToolFailed { .. }));
    }
}
