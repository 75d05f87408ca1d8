//! Clients for the external data services

pub mod duckduckgo;
pub mod yahoo;

pub use duckduckgo::{DuckDuckGoClient, SearchBackend, SearchHit};
pub use yahoo::{KeyStatistics, QuoteSource, YahooQuoteSource};
