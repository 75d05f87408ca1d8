//! Provider errors

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LLMError>;

/// Why a completion could not be produced
#[derive(Error, Debug)]
pub enum LLMError {
    /// Non-success status not covered by a more specific variant
    #[error("Completion request failed with HTTP {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("Provider rejected the API key")]
    AuthenticationFailed,

    #[error("Provider rate limit hit: {0}")]
    RateLimitExceeded(String),

    /// The provider refused the request body (bad tool schema, too many tokens)
    #[error("Provider rejected the request: {0}")]
    InvalidRequest(String),

    #[error("Model '{0}' is not served by this provider")]
    ModelNotFound(String),

    #[error("Could not encode or decode JSON: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Transport error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Well-formed HTTP, but not a usable chat completion
    #[error("Unexpected completion payload: {0}")]
    UnexpectedResponse(String),

    #[error("Provider is not configured: {0}")]
    ConfigurationError(String),
}

impl LLMError {
    /// Classify a non-success HTTP response
    pub fn from_status(status: u16, model: &str, body: String) -> Self {
        match status {
            400 | 422 => Self::InvalidRequest(body),
            401 | 403 => Self::AuthenticationFailed,
            404 => Self::ModelNotFound(model.to_string()),
            429 => Self::RateLimitExceeded(body),
            _ => Self::RequestFailed { status, body },
        }
    }

    /// Whether the same request could succeed later
    ///
    /// The crews never retry; this is surfaced in logs only.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RateLimitExceeded(_) | Self::HttpError(_) => true,
            Self::RequestFailed { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            LLMError::from_status(401, "gpt-4o-mini", String::new()),
            LLMError::AuthenticationFailed
        ));
        assert!(matches!(
            LLMError::from_status(404, "gpt-4o-mini", "no such model".to_string()),
            LLMError::ModelNotFound(ref m) if m == "gpt-4o-mini"
        ));
        assert!(matches!(
            LLMError::from_status(422, "m", "tools[0] invalid".to_string()),
            LLMError::InvalidRequest(_)
        ));

        let upstream = LLMError::from_status(503, "m", "overloaded".to_string());
        assert_eq!(
            upstream.to_string(),
            "Completion request failed with HTTP 503: overloaded"
        );
        assert!(upstream.is_transient());
        assert!(!LLMError::AuthenticationFailed.is_transient());
    }
}
