//! Configuration management utilities
//!
//! Values come from the process environment. A `.env` file in the working
//! directory is loaded first when present, without overriding variables that
//! are already set.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Environment variable names read by [`Config::from_env`]
pub mod env {
    pub const APP_NAME: &str = "CREW_APP_NAME";
    pub const ENVIRONMENT: &str = "CREW_ENV";
    pub const MODEL: &str = "CREW_MODEL";
    pub const API_BASE: &str = "OPENAI_API_BASE";
    pub const TIMEOUT_SECS: &str = "CREW_TIMEOUT_SECS";
    pub const LANGUAGE: &str = "CREW_LANGUAGE";
    pub const MAX_ITERATIONS: &str = "CREW_MAX_ITERATIONS";
}

/// Errors raised while reading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application name
    pub app_name: String,
    /// Environment (dev, prod, etc.)
    pub environment: String,
    /// Model identifier passed to the LLM provider
    pub model: String,
    /// Override for the provider base URL
    pub api_base: Option<String>,
    /// Per-request timeout for LLM calls
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// Prompt language code ("ko" or "en")
    pub language: String,
    /// Upper bound on tool-use iterations per agent
    pub max_iterations: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "stock-crew".to_string(),
            environment: "development".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_base: None,
            timeout: Duration::from_secs(120),
            language: "ko".to_string(),
            max_iterations: 15,
        }
    }
}

impl Config {
    /// Load `.env` (if any) and read overrides from the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup
    ///
    /// Missing keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup(env::APP_NAME) {
            config.app_name = v;
        }
        if let Some(v) = lookup(env::ENVIRONMENT) {
            config.environment = v;
        }
        if let Some(v) = lookup(env::MODEL) {
            config.model = v;
        }
        config.api_base = lookup(env::API_BASE).filter(|v| !v.trim().is_empty());
        if let Some(v) = lookup(env::TIMEOUT_SECS) {
            let secs = v.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                key: env::TIMEOUT_SECS,
                value: v.clone(),
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(v) = lookup(env::LANGUAGE) {
            config.language = v;
        }
        if let Some(v) = lookup(env::MAX_ITERATIONS) {
            config.max_iterations = match v.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: env::MAX_ITERATIONS,
                        value: v,
                    });
                }
            };
        }

        Ok(config)
    }

    /// Whether this is a production deployment
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
            || self.environment.eq_ignore_ascii_case("prod")
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}
