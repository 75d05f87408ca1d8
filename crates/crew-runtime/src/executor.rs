//! Agent executor for running agent loops
//!
//! The AgentExecutor implements the tool-use loop:
//! 1. Call the model with the conversation and the agent's tools
//! 2. If it asks for tools, run them in order and append the results
//! 3. Repeat until the model ends its turn or the iteration limit is hit

use crew_core::{Error, Result};
use crew_llm::{
    CompletionRequest, ContentBlock, LLMProvider, Message, StopReason, TokenUsage, ToolDefinition,
};
use crew_llm::messages::ToolCall;
use crew_tools::{ToolRegistry, render_output};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

const FINAL_ANSWER_NUDGE: &str =
    "Tool budget exhausted. Give your best final answer now using what you already have.";

/// Event handler for agent execution events
///
/// Implement this to observe tool calls as they happen, e.g. for verbose
/// console output.
#[async_trait]
pub trait ExecutorEventHandler: Send + Sync {
    /// Called when a tool execution starts
    async fn on_tool_start(&self, _agent: &str, _tool: &str, _input: &Value) {}

    /// Called when a tool execution completes
    async fn on_tool_done(
        &self,
        _agent: &str,
        _tool: &str,
        _result: std::result::Result<&str, &str>,
        _duration_ms: u64,
    ) {
    }

    /// Called when the agent produces its final answer
    async fn on_complete(&self, _agent: &str, _output: &str) {}
}

/// No-op event handler
pub struct NoOpEventHandler;

#[async_trait]
impl ExecutorEventHandler for NoOpEventHandler {}

/// What to do when a tool returns an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolErrorPolicy {
    /// Abort the run with [`Error::ToolFailed`]
    #[default]
    Propagate,
    /// Hand the error text back to the model as an error tool result
    ReportToModel,
}

/// Configuration for agent execution
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Maximum number of tool rounds before a final answer is forced
    pub max_iterations: usize,

    /// Model to use
    pub model: String,

    /// System prompt
    pub system_prompt: Option<String>,

    /// Max tokens per completion
    pub max_tokens: usize,

    /// Temperature
    pub temperature: Option<f32>,

    /// Tool failure handling
    pub tool_error_policy: ToolErrorPolicy,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_iterations: 15,
            model: "gpt-4o-mini".to_string(),
            system_prompt: None,
            max_tokens: crew_llm::completion::DEFAULT_MAX_TOKENS,
            temperature: Some(0.2),
            tool_error_policy: ToolErrorPolicy::Propagate,
        }
    }
}

/// Executes an agent loop: LLM → tool calls → execution → loop back
pub struct AgentExecutor {
    name: String,
    provider: Arc<dyn LLMProvider>,
    tool_registry: Arc<ToolRegistry>,
    config: ExecutorConfig,
    event_handler: Arc<dyn ExecutorEventHandler>,
}

impl AgentExecutor {
    /// `name` only labels logs and events
    pub fn new(
        name: impl Into<String>,
        provider: Arc<dyn LLMProvider>,
        tool_registry: Arc<ToolRegistry>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            name: name.into(),
            provider,
            tool_registry,
            config,
            event_handler: Arc::new(NoOpEventHandler),
        }
    }

    pub fn with_event_handler(mut self, handler: Arc<dyn ExecutorEventHandler>) -> Self {
        self.event_handler = handler;
        self
    }

    /// Run the loop for one user message and return the final answer
    pub async fn run(&self, user_message: String) -> Result<String> {
        let mut conversation = vec![Message::user(user_message)];
        let tools = self.tool_definitions();
        let mut usage = TokenUsage::default();

        for iteration in 1..=self.config.max_iterations {
            debug!(
                agent = %self.name,
                iteration,
                max_iterations = self.config.max_iterations,
                tool_count = tools.len(),
                "Agent iteration started"
            );

            let request = self.request(conversation.clone(), tools.clone());
            let response = self
                .provider
                .complete(request)
                .await
                .map_err(|e| Error::ProcessingFailed(format!("{}: {e}", self.name)))?;
            usage += response.usage;

            debug!(
                agent = %self.name,
                stop_reason = ?response.stop_reason,
                input_tokens = response.usage.input_tokens,
                output_tokens = response.usage.output_tokens,
                "LLM response received"
            );

            let calls_requested = response.message.has_tool_calls();
            match response.stop_reason {
                StopReason::ToolUse if calls_requested => {
                    let results = self.execute_tools(&response.message).await?;
                    conversation.push(response.message);
                    conversation.push(Message::tool_results(results));
                }
                StopReason::ToolUse => {
                    warn!(agent = %self.name, "Tool use signalled without tool calls");
                    return self.finish(&response.message, iteration, usage).await;
                }
                StopReason::MaxTokens => {
                    warn!(agent = %self.name, "Hit max tokens, answer may be truncated");
                    return self.finish(&response.message, iteration, usage).await;
                }
                StopReason::EndTurn | StopReason::StopSequence => {
                    return self.finish(&response.message, iteration, usage).await;
                }
            }
        }

        warn!(
            agent = %self.name,
            max_iterations = self.config.max_iterations,
            "Max iterations reached, forcing final answer"
        );
        conversation.push(Message::user(FINAL_ANSWER_NUDGE));
        let response = self
            .provider
            .complete(self.request(conversation, Vec::new()))
            .await
            .map_err(|e| Error::ProcessingFailed(format!("{}: {e}", self.name)))?;
        usage += response.usage;
        self.finish(&response.message, self.config.max_iterations + 1, usage)
            .await
    }

    fn request(&self, messages: Vec<Message>, tools: Vec<ToolDefinition>) -> CompletionRequest {
        let mut builder = CompletionRequest::builder(&self.config.model)
            .messages(messages)
            .max_tokens(self.config.max_tokens)
            .tools(tools);
        if let Some(system) = &self.config.system_prompt {
            builder = builder.system(system.clone());
        }
        if let Some(temperature) = self.config.temperature {
            builder = builder.temperature(temperature);
        }
        builder.build()
    }

    async fn finish(&self, message: &Message, iterations: usize, usage: TokenUsage) -> Result<String> {
        let text = message
            .text()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                Error::ProcessingFailed(format!("{} returned an empty answer", self.name))
            })?;

        info!(
            agent = %self.name,
            iterations,
            total_tokens = usage.total(),
            response_length = text.len(),
            "Agent completed"
        );
        self.event_handler.on_complete(&self.name, &text).await;
        Ok(text)
    }

    fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tool_registry
            .iter()
            .map(|tool| ToolDefinition::new(tool.name(), tool.description(), tool.input_schema()))
            .collect()
    }

    /// Run every tool call in the message, in order
    async fn execute_tools(&self, message: &Message) -> Result<Vec<ContentBlock>> {
        let calls = message.tool_calls();
        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            results.push(self.execute_tool(call).await?);
        }
        Ok(results)
    }

    async fn execute_tool(&self, call: ToolCall<'_>) -> Result<ContentBlock> {
        let input_preview: String = call.input.to_string().chars().take(300).collect();
        info!(
            agent = %self.name,
            tool_name = %call.name,
            tool_id = %call.id,
            input_preview = %input_preview,
            "Executing tool"
        );
        self.event_handler
            .on_tool_start(&self.name, call.name, call.input)
            .await;

        let Some(tool) = self.tool_registry.get(call.name) else {
            let available = self.tool_registry.names().join(", ");
            warn!(agent = %self.name, tool_name = %call.name, "Model requested unknown tool");
            let message = format!("Unknown tool '{}'. Available tools: [{available}]", call.name);
            self.event_handler
                .on_tool_done(&self.name, call.name, Err(&message), 0)
                .await;
            return Ok(ContentBlock::tool_error(call.id, message));
        };

        let start = Instant::now();
        let outcome = tool.execute(call.input.clone()).await;
        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        match outcome {
            Ok(value) => {
                let text = render_output(&value);
                info!(
                    agent = %self.name,
                    tool_name = %call.name,
                    duration_ms,
                    result_length = text.len(),
                    "Tool execution succeeded"
                );
                self.event_handler
                    .on_tool_done(&self.name, call.name, Ok(&text), duration_ms)
                    .await;
                Ok(ContentBlock::tool_result(call.id, text))
            }
            Err(e) => {
                let error_text = e.to_string();
                warn!(
                    agent = %self.name,
                    tool_name = %call.name,
                    duration_ms,
                    error = %error_text,
                    policy = ?self.config.tool_error_policy,
                    "Tool execution failed"
                );
                self.event_handler
                    .on_tool_done(&self.name, call.name, Err(&error_text), duration_ms)
                    .await;

                match self.config.tool_error_policy {
                    ToolErrorPolicy::Propagate => Err(match e {
                        err @ (Error::ToolFailed { .. } | Error::DelegationFailed { .. }) => err,
                        other => Error::tool(call.name, other.to_string()),
                    }),
                    ToolErrorPolicy::ReportToModel => {
                        Ok(ContentBlock::tool_error(call.id, format!("Error: {error_text}")))
                    }
                }
            }
        }
    }
}
