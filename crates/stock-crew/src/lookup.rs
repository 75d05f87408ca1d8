//! Yahoo Finance ticker lookup links

use crate::error::{Result, StockError};
use url::Url;

/// Yahoo Finance symbol lookup page
pub const LOOKUP_BASE: &str = "https://finance.yahoo.com/lookup";

/// Link to Yahoo's lookup page for a company name
pub fn lookup_url(company: &str) -> Result<Url> {
    let company = company.trim();
    if company.is_empty() {
        return Err(StockError::InvalidInput("company name must not be empty".to_string()));
    }
    Url::parse_with_params(LOOKUP_BASE, &[("s", company)])
        .map_err(|e| StockError::Other(format!("Invalid lookup URL: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_url() {
        assert_eq!(
            lookup_url("Apple").unwrap().as_str(),
            "https://finance.yahoo.com/lookup?s=Apple"
        );
    }

    #[test]
    fn test_lookup_url_encodes() {
        let url = lookup_url(" Samsung Electronics & Co ").unwrap();
        assert_eq!(url.query(), Some("s=Samsung+Electronics+%26+Co"));

        let url = lookup_url("삼성전자").unwrap();
        assert_eq!(url.query_pairs().next().unwrap().1, "삼성전자");
    }

    #[test]
    fn test_lookup_url_rejects_empty() {
        assert!(lookup_url("   ").is_err());
    }
}
