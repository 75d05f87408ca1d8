//! Agent role definitions

use crew_tools::Tool;
use std::fmt;
use std::sync::Arc;

/// A role-bound agent definition
///
/// `role` is both the display name and the routing key for delegation, so
/// it is never interpolated. `goal` and `backstory` may contain
/// `{{ input }}` placeholders filled at kickoff. The definition cannot be
/// changed once built.
#[derive(Clone)]
pub struct AgentRole {
    role: String,
    goal: String,
    backstory: String,
    tools: Vec<Arc<dyn Tool>>,
    allow_delegation: bool,
    max_iterations: Option<usize>,
}

impl AgentRole {
    /// Create a role with no tools that does not delegate
    pub fn new(role: impl Into<String>, goal: impl Into<String>, backstory: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
            tools: Vec::new(),
            allow_delegation: false,
            max_iterations: None,
        }
    }

    /// Bind a tool
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    /// Allow or forbid delegation
    pub fn allow_delegation(mut self, allow: bool) -> Self {
        self.allow_delegation = allow;
        self
    }

    /// Override the runtime's iteration limit for this agent
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = Some(max);
        self
    }

    /// Role name, also the delegation key
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Goal template, may hold `{{ input }}` placeholders
    pub fn goal(&self) -> &str {
        &self.goal
    }

    /// Backstory template
    pub fn backstory(&self) -> &str {
        &self.backstory
    }

    /// Tools this agent may call
    pub fn tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    /// Whether the agent may hand work to co-workers
    pub fn can_delegate(&self) -> bool {
        self.allow_delegation
    }

    /// Tool-call round cap, if set
    pub fn iteration_limit(&self) -> Option<usize> {
        self.max_iterations
    }

    /// Names of the bound tools
    pub fn tool_names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name().to_string()).collect()
    }
}

impl fmt::Debug for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentRole")
            .field("role", &self.role)
            .field("tools", &self.tool_names())
            .field("allow_delegation", &self.allow_delegation)
            .finish_non_exhaustive()
    }
}
