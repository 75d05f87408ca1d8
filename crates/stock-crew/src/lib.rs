//! Stock analysis crews
//!
//! Two applications on the crew framework:
//!
//! - [`NewsOpinionCrew`]: a sequential crew. A news analyst searches and
//!   summarizes the latest news for a keyword, then an advisor writes an
//!   opinion from a chosen investor perspective using that summary.
//! - [`InvestmentCrew`]: a hierarchical crew. A manager delegates, in a
//!   fixed order, to news, fundamental, risk and portfolio specialists and
//!   combines their answers into an [`InvestmentReport`].
//!
//! Data comes from two tools: `duckduckgo_stock_news` (web search) and
//! `finance_data` (price, PER, EPS, beta from Yahoo Finance). Both sit
//! behind traits ([`SearchBackend`], [`QuoteSource`]) so they can be
//! swapped in tests.

pub mod api;
pub mod cache;
pub mod config;
pub mod crews;
pub mod error;
pub mod inputs;
pub mod lookup;
pub mod prompts;
pub mod report;
pub mod tools;

pub use api::{DuckDuckGoClient, KeyStatistics, QuoteSource, SearchBackend, SearchHit, YahooQuoteSource};
pub use config::StockConfig;
pub use crews::{InvestmentCrew, NewsOpinionCrew};
pub use error::{Result, StockError};
pub use inputs::{Budget, InvestmentRequest, NewsRequest, Perspective, RiskPreference};
pub use lookup::lookup_url;
pub use report::{InvestmentReport, NewsOpinion, ReportSection, SectionStatus};
pub use tools::{FinanceDataTool, FinancialSnapshot, StockNewsTool, StockToolkit};
