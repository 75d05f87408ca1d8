//! Stock news search tool

use crate::api::{SearchBackend, SearchHit};
use crate::cache::StockCache;
use async_trait::async_trait;
use crew_core::{Error, Result};
use crew_llm::tools::schema;
use crew_tools::Tool;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::info;

/// Text returned when a query has no hits
pub const NO_RESULTS: &str = "No good search result was found";

/// `duckduckgo_stock_news`: latest news snippets for a ticker or keyword
pub struct StockNewsTool {
    backend: Arc<dyn SearchBackend>,
    cache: StockCache<String>,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    query: String,
}

impl StockNewsTool {
    pub fn new(backend: Arc<dyn SearchBackend>, cache: StockCache<String>, max_results: usize) -> Self {
        Self {
            backend,
            cache,
            max_results,
        }
    }

    async fn search(&self, query: &str) -> Result<String> {
        self.cache
            .get_or_fetch(&query.to_lowercase(), || async {
                let hits = self
                    .backend
                    .search(query, self.max_results)
                    .await
                    .map_err(|e| Error::tool(self.name(), e.to_string()))?;
                info!(query = %query, hits = hits.len(), "News search completed");
                Ok::<_, Error>(render_hits(&hits))
            })
            .await
    }
}

/// One line per hit: `title: snippet (url)`, or `title (url)` without a snippet
fn render_hits(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return NO_RESULTS.to_string();
    }
    hits.iter()
        .map(|hit| {
            if hit.snippet.is_empty() {
                format!("{} ({})", hit.title, hit.url)
            } else {
                format!("{}: {} ({})", hit.title, hit.snippet, hit.url)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl Tool for StockNewsTool {
    async fn execute(&self, params: Value) -> Result<Value> {
        let params: SearchParams = serde_json::from_value(params)
            .map_err(|e| Error::tool(self.name(), format!("Invalid parameters: {e}")))?;
        let query = params.query.trim();
        if query.is_empty() {
            return Err(Error::tool(self.name(), "query must not be empty"));
        }

        Ok(Value::String(self.search(query).await?))
    }

    fn name(&self) -> &'static str {
        "duckduckgo_stock_news"
    }

    fn description(&self) -> &'static str {
        "특정 주식 종목에 대한 최신 뉴스를 검색하는 도구입니다. 종목명, 티커 또는 키워드로 검색합니다."
    }

    fn input_schema(&self) -> Value {
        schema::object(
            json!({ "query": schema::string("검색어 (예: 'AAPL stock news', '삼성전자 반도체')") }),
            &["query"],
        )
    }
}
