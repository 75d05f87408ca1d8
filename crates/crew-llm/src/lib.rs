//! Talking to a chat-completion model
//!
//! Requests and responses are provider-neutral ([`CompletionRequest`],
//! [`Message`] with tool-use blocks). [`providers::OpenAIProvider`] speaks the
//! OpenAI-compatible HTTP API; `testing` (feature `testing`) has a scripted
//! provider for tests.

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;
pub mod providers;
pub mod tools;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{ContentBlock, Message, MessageContent, Role};
pub use provider::LLMProvider;
pub use tools::ToolDefinition;
