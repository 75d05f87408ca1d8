//! Validated user inputs for the two crews

use crate::error::{Result, StockError};
use crew_prompt::group_thousands;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use std::str::FromStr;

/// Default keyword for the news crew
pub const DEFAULT_KEYWORD: &str = "삼성전자 반도체";
/// Default ticker for the investment crew
pub const DEFAULT_TICKER: &str = "AAPL";
/// Default company for ticker lookup
pub const DEFAULT_COMPANY: &str = "Apple";

/// Investor perspective for the opinion task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Perspective {
    #[default]
    LongTerm,
    ShortTerm,
}

impl Perspective {
    pub const ALL: [Self; 2] = [Self::LongTerm, Self::ShortTerm];

    /// Label used in prompts
    pub fn label(self) -> &'static str {
        match self {
            Self::LongTerm => "장기 투자자 관점",
            Self::ShortTerm => "단기 투자자 관점",
        }
    }
}

impl fmt::Display for Perspective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Perspective {
    type Err = StockError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "long" | "long-term" | "장기" | "장기 투자자 관점" => Ok(Self::LongTerm),
            "short" | "short-term" | "단기" | "단기 투자자 관점" => Ok(Self::ShortTerm),
            other => Err(StockError::InvalidInput(format!(
                "unknown perspective '{other}' (expected long or short)"
            ))),
        }
    }
}

/// Risk appetite for the portfolio step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskPreference {
    Low,
    #[default]
    Medium,
    High,
}

impl RiskPreference {
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Label used in prompts
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "낮음",
            Self::Medium => "중간",
            Self::High => "높음",
        }
    }
}

impl fmt::Display for RiskPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RiskPreference {
    type Err = StockError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "low" | "낮음" => Ok(Self::Low),
            "medium" | "중간" => Ok(Self::Medium),
            "high" | "높음" => Ok(Self::High),
            other => Err(StockError::InvalidInput(format!(
                "unknown risk preference '{other}' (expected low, medium or high)"
            ))),
        }
    }
}

/// Investment budget in KRW
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Budget(u64);

impl Budget {
    pub const MIN: u64 = 100_000;
    pub const MAX: u64 = 1_000_000_000;
    pub const STEP: u64 = 100_000;
    pub const DEFAULT: u64 = 10_000_000;

    /// Accept amounts in range and on the 100,000 step
    pub fn new(amount: u64) -> Result<Self> {
        if !(Self::MIN..=Self::MAX).contains(&amount) {
            return Err(StockError::InvalidInput(format!(
                "budget {amount} must be between {} and {}",
                Self::MIN,
                Self::MAX
            )));
        }
        if amount % Self::STEP != 0 {
            return Err(StockError::InvalidInput(format!(
                "budget {amount} must be a multiple of {}",
                Self::STEP
            )));
        }
        Ok(Self(amount))
    }

    pub fn amount(self) -> u64 {
        self.0
    }
}

impl Default for Budget {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<u64> for Budget {
    type Error = StockError;

    fn try_from(amount: u64) -> Result<Self> {
        Self::new(amount)
    }
}

impl From<Budget> for u64 {
    fn from(budget: Budget) -> Self {
        budget.0
    }
}

impl FromStr for Budget {
    type Err = StockError;

    /// Digits with optional `,` or `_` separators and a trailing `원`
    fn from_str(s: &str) -> Result<Self> {
        let digits: String = s
            .trim()
            .trim_end_matches('원')
            .chars().filter(|c| !matches!(c, ',' | '_')).collect();
        let amount = digits
            .parse::<u64>()
            .map_err(|_| StockError::InvalidInput(format!("budget '{s}' is not a whole number")))?;
        Self::new(amount)
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}원", group_thousands(self.0))
    }
}

fn non_empty(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(StockError::InvalidInput(format!("{field} must not be empty")));
    }
    Ok(value.to_string())
}

/// Input for the news and opinion crew
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsRequest {
    pub keyword: String,
    pub perspective: Perspective,
}

impl NewsRequest {
    pub fn new(keyword: &str, perspective: Perspective) -> Result<Self> {
        Ok(Self {
            keyword: non_empty("keyword", keyword)?,
            perspective,
        })
    }

    /// Kickoff inputs
    pub fn to_inputs(&self) -> Value {
        json!({
            "ticker": self.keyword,
            "perspective": self.perspective.label(),
        })
    }
}

impl Default for NewsRequest {
    fn default() -> Self {
        Self {
            keyword: DEFAULT_KEYWORD.to_string(),
            perspective: Perspective::default(),
        }
    }
}

/// Input for the hierarchical investment crew
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestmentRequest {
    pub ticker: String,
    pub budget: Budget,
    pub risk: RiskPreference,
}

impl InvestmentRequest {
    pub fn new(ticker: &str, budget: Budget, risk: RiskPreference) -> Result<Self> {
        Ok(Self {
            ticker: non_empty("ticker", ticker)?,
            budget,
            risk,
        })
    }

    /// Kickoff inputs
    pub fn to_inputs(&self) -> Value {
        json!({
            "ticker": self.ticker,
            "budget": self.budget.amount(),
            "risk": self.risk.label(),
        })
    }
}

impl Default for InvestmentRequest {
    fn default() -> Self {
        Self {
            ticker: DEFAULT_TICKER.to_string(),
            budget: Budget::default(),
            risk: RiskPreference::default(),
        }
    }
}
