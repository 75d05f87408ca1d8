//! Runtime for constructing agents with shared dependencies
//!
//! The AgentRuntime owns the LLM provider and execution defaults. Each agent
//! gets its own tool registry at construction time.

use crew_core::{Error, Result};
use crew_llm::LLMProvider;
use crew_tools::ToolRegistry;
use std::sync::Arc;
use tracing::debug;

use crate::role_agent::RoleAgent;
use crate::executor::{AgentExecutor, ExecutorConfig, ExecutorEventHandler, ToolErrorPolicy};

/// Defaults applied to every executor the runtime creates
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Tool rounds per agent before a final answer is forced
    pub default_max_iterations: usize,

    /// Model identifier
    pub default_model: String,

    /// Max tokens per completion
    pub default_max_tokens: usize,

    /// Sampling temperature
    pub default_temperature: Option<f32>,

    /// Tool failure handling
    pub tool_error_policy: ToolErrorPolicy,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        let exec = ExecutorConfig::default();
        Self {
            default_max_iterations: exec.max_iterations,
            default_model: exec.model,
            default_max_tokens: exec.max_tokens,
            default_temperature: exec.temperature,
            tool_error_policy: exec.tool_error_policy,
        }
    }
}

impl RuntimeConfig {
    /// Take model and iteration defaults from application config
    pub fn from_app_config(app: &crew_utils::Config) -> Self {
        Self {
            default_max_iterations: app.max_iterations,
            default_model: app.model.clone(),
            ..Self::default()
        }
    }
}

/// Shared provider plus defaults; a factory for agents
pub struct AgentRuntime {
    provider: Arc<dyn LLMProvider>,
    config: RuntimeConfig,
    event_handler: Option<Arc<dyn ExecutorEventHandler>>,
}

impl AgentRuntime {
    /// Create a builder
    pub fn builder() -> AgentRuntimeBuilder {
        AgentRuntimeBuilder::new()
    }

    /// The shared provider
    pub fn provider(&self) -> &Arc<dyn LLMProvider> {
        &self.provider
    }

    /// Runtime defaults
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Executor config seeded from the runtime defaults
    pub fn executor_config(&self, system_prompt: impl Into<String>) -> ExecutorConfig {
        ExecutorConfig {
            max_iterations: self.config.default_max_iterations,
            model: self.config.default_model.clone(),
            system_prompt: Some(system_prompt.into()),
            max_tokens: self.config.default_max_tokens,
            temperature: self.config.default_temperature,
            tool_error_policy: self.config.tool_error_policy,
        }
    }

    /// Agent for `role` that may call `tools`
    pub fn create_role_agent(
        &self,
        role: &str,
        config: ExecutorConfig,
        tools: Arc<ToolRegistry>,
    ) -> RoleAgent {
        debug!(role, tools = ?tools.names(), "Creating agent");

        let mut executor = AgentExecutor::new(role, self.provider.clone(), tools, config);
        if let Some(handler) = &self.event_handler {
            executor = executor.with_event_handler(handler.clone());
        }
        RoleAgent::new(role, executor)
    }
}

/// Builder for [`AgentRuntime`]
pub struct AgentRuntimeBuilder {
    provider: Option<Arc<dyn LLMProvider>>,
    config: RuntimeConfig,
    event_handler: Option<Arc<dyn ExecutorEventHandler>>,
}

impl AgentRuntimeBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            provider: None,
            config: RuntimeConfig::default(),
            event_handler: None,
        }
    }

    /// Set the LLM provider
    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the full configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the default iteration limit
    pub fn default_max_iterations(mut self, max: usize) -> Self {
        self.config.default_max_iterations = max;
        self
    }

    /// Set the default model
    pub fn default_model(mut self, model: impl Into<String>) -> Self {
        self.config.default_model = model.into();
        self
    }

    /// Set the tool error policy for every agent
    pub fn tool_error_policy(mut self, policy: ToolErrorPolicy) -> Self {
        self.config.tool_error_policy = policy;
        self
    }

    /// Attach an event handler to every agent
    pub fn event_handler(mut self, handler: Arc<dyn ExecutorEventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }

    /// Build the runtime
    pub fn build(self) -> Result<AgentRuntime> {
        let provider = self
            .provider
            .ok_or_else(|| Error::InitializationFailed("Provider not set".to_string()))?;

        Ok(AgentRuntime {
            provider,
            config: self.config,
            event_handler: self.event_handler,
        })
    }
}

impl Default for AgentRuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
