//! Errors shared by agents, tools and crews

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Generic(String),

    /// Agent could not be built (missing provider, bad configuration)
    #[error("Agent initialization failed: {0}")]
    InitializationFailed(String),

    /// Model call failed or the agent produced no usable answer
    #[error("Agent processing failed: {0}")]
    ProcessingFailed(String),

    #[error("Tool '{tool}' failed: {message}")]
    ToolFailed { tool: String, message: String },

    /// A coworker ran and failed, or refused the request
    #[error("Delegation to '{coworker}' failed: {message}")]
    DelegationFailed { coworker: String, message: String },
}

impl Error {
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolFailed {
            tool: tool.into(),
            message: message.into(),
        }
    }
}
