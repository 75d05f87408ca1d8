//! Prompt text for crew agents
//!
//! - [`interpolate`]: strict `{{ variable }}` rendering with MiniJinja
//! - [`Language`]: which language the shared prompt scaffolding uses
//! - [`PromptBuilder`]: small helper for sectioned prompts
//! - [`crew`]: the system and task prompts every agent receives
//!
//! ```
//! use crew_prompt::interpolate;
//! use serde_json::json;
//!
//! let goal = interpolate("news_goal", "{{ ticker }} 관련 최신 뉴스를 수집", &json!({ "ticker": "AAPL" }))
//!     .unwrap();
//! assert_eq!(goal, "AAPL 관련 최신 뉴스를 수집");
//! ```

pub mod builder;
pub mod crew;
pub mod error;
pub mod jinja;
pub mod language;

pub use builder::PromptBuilder;
pub use error::{PromptError, Result};
pub use jinja::{group_thousands, interpolate};
pub use language::Language;
