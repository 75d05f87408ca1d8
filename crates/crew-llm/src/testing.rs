//! Deterministic providers for tests
//!
//! Enabled with the `testing` feature. Nothing here talks to the network.

use crate::{
    CompletionRequest, CompletionResponse, ContentBlock, LLMError, LLMProvider, Message, Result,
    StopReason, TokenUsage,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

type Responder = Box<dyn Fn(&CompletionRequest) -> CompletionResponse + Send + Sync>;

enum Script {
    Queue(Mutex<VecDeque<CompletionResponse>>),
    Func(Responder),
}

/// Provider that replays canned responses and records every request
pub struct ScriptedProvider {
    script: Script,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    /// Replay `responses` in order; fails once they run out
    pub fn new(responses: impl IntoIterator<Item = CompletionResponse>) -> Self {
        Self {
            script: Script::Queue(Mutex::new(responses.into_iter().collect())),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Compute each response from the incoming request
    pub fn from_fn<F>(responder: F) -> Self
    where
        F: Fn(&CompletionRequest) -> CompletionResponse + Send + Sync + 'static,
    {
        Self {
            script: Script::Func(Box::new(responder)),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests seen so far, oldest first
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Number of completions served
    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let response = match &self.script {
            Script::Queue(queue) => queue
                .lock()
                .map_err(|_| LLMError::UnexpectedResponse("script lock poisoned".to_string()))?
                .pop_front()
                .ok_or_else(|| LLMError::UnexpectedResponse("script exhausted".to_string()))?,
            Script::Func(responder) => responder(&request),
        };

        if let Ok(mut seen) = self.requests.lock() {
            seen.push(request);
        }
        Ok(response)
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// A final text answer
pub fn text_response(text: impl Into<String>) -> CompletionResponse {
    CompletionResponse {
        message: Message::assistant_blocks(vec![ContentBlock::Text { text: text.into() }]),
        stop_reason: StopReason::EndTurn,
        usage: TokenUsage::default(),
    }
}

/// A single tool call
pub fn tool_call_response(
    id: impl Into<String>,
    name: impl Into<String>,
    input: serde_json::Value,
) -> CompletionResponse {
    CompletionResponse {
        message: Message::assistant_blocks(vec![ContentBlock::ToolUse {
            id: id.into(),
            name: name.into(),
            input,
        }]),
        stop_reason: StopReason::ToolUse,
        usage: TokenUsage::default(),
    }
}

/// Text of the last tool result in a request, if the last turn carries one
pub fn last_tool_result(request: &CompletionRequest) -> Option<(String, bool)> {
    let last = request.messages.last()?;
    match &last.content {
        Some(crate::MessageContent::Blocks(blocks)) => blocks.iter().rev().find_map(|b| match b {
            ContentBlock::ToolResult {
                content, is_error, ..
            } => Some((content.clone(), is_error.unwrap_or(false))),
            _ => None,
        }),
        _ => None,
    }
}
