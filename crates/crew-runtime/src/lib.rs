//! Running a single agent
//!
//! - [`AgentExecutor`]: the tool-use loop (model call, tool execution, repeat)
//! - [`AgentRuntime`]: shared provider and defaults; builds agents
//! - [`RoleAgent`]: a crew role answered by an executor

pub mod executor;
pub mod role_agent;
pub mod runtime;

pub use executor::{
    AgentExecutor, ExecutorConfig, ExecutorEventHandler, NoOpEventHandler, ToolErrorPolicy,
};
pub use role_agent::RoleAgent;
pub use runtime::{AgentRuntime, AgentRuntimeBuilder, RuntimeConfig};
