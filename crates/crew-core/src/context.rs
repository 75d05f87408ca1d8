//! Per-run state handed to every agent
//!
//! One [`Context`] is created at kickoff. It carries the run id, the prompt
//! language and the kickoff inputs. Workers called through delegation get a
//! clone, so nothing they record leaks back to the manager.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// # Example
///
/// ```
/// use crew_core::Context;
///
/// let ctx = Context::new()
///     .with_language("ko")
///     .with_input("ticker", "AAPL");
///
/// assert_eq!(ctx.language(), Some("ko"));
/// assert_eq!(ctx.input_str("ticker"), Some("AAPL"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    run_id: Option<String>,
    language: Option<String>,
    current_role: Option<String>,
    #[serde(default)]
    inputs: Map<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh context with a random run id
    pub fn for_run() -> Self {
        Self {
            run_id: Some(Uuid::new_v4().to_string()),
            ..Self::default()
        }
    }

    pub fn with_language(mut self, lang: impl Into<String>) -> Self {
        self.language = Some(lang.into());
        self
    }

    pub fn with_input(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_input(name, value);
        self
    }

    pub fn run_id(&self) -> Option<&str> {
        self.run_id.as_deref()
    }

    /// Language code ("ko", "en")
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Role of the agent currently executing
    pub fn current_role(&self) -> Option<&str> {
        self.current_role.as_deref()
    }

    pub fn set_current_role(&mut self, role: impl Into<String>) {
        self.current_role = Some(role.into());
    }

    pub fn inputs(&self) -> &Map<String, Value> {
        &self.inputs
    }

    pub fn input(&self, name: &str) -> Option<&Value> {
        self.inputs.get(name)
    }

    /// Input as a string; `None` when missing or not a string
    pub fn input_str(&self, name: &str) -> Option<&str> {
        self.input(name).and_then(Value::as_str)
    }

    /// Add or replace one kickoff input
    pub fn set_input(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.inputs.insert(name.into(), value.into());
    }
}
