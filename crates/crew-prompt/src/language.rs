//! Prompt language selection

use serde::{Deserialize, Serialize};
use std::fmt;

/// Language a prompt is written in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    Korean,
    English,
    Other(String),
}

impl Language {
    /// ISO 639-1 style code
    pub fn code(&self) -> &str {
        match self {
            Language::Korean => "ko",
            Language::English => "en",
            Language::Other(code) => code,
        }
    }

    /// Parse a code or name; unknown values become [`Language::Other`]
    pub fn from_code(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "ko" | "kr" | "korean" | "한국어" | "ko-kr" => Language::Korean,
            "en" | "english" | "en-us" => Language::English,
            other => Language::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Korean => f.write_str("Korean"),
            Language::English => f.write_str("English"),
            Language::Other(code) => f.write_str(code),
        }
    }
}
