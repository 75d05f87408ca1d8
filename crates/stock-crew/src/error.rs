//! Errors from the stock data sources and crews

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StockError {
    /// Upstream answered with a non-success status
    #[error("{service} returned HTTP {status}")]
    ApiError { service: &'static str, status: u16 },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Quote lookup failed or returned nothing usable
    #[error("Yahoo Finance error: {0}")]
    YahooFinanceError(String),

    #[error("Search error: {0}")]
    SearchError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A user input is out of range or malformed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The crew could not be built or failed while running
    #[error(transparent)]
    Crew(#[from] crew_workflow::CrewError),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, StockError>;

impl From<StockError> for crew_core::Error {
    fn from(err: StockError) -> Self {
        crew_core::Error::ProcessingFailed(err.to_string())
    }
}

impl From<crew_core::Error> for StockError {
    fn from(err: crew_core::Error) -> Self {
        StockError::Other(err.to_string())
    }
}
