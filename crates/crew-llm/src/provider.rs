use crate::{CompletionRequest, CompletionResponse, Result};
use async_trait::async_trait;

/// A chat-completion backend
///
/// `complete` is a single round trip. Running tools and calling again is the
/// executor's job.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Short label for logs, such as "openai"
    fn name(&self) -> &str;
}
