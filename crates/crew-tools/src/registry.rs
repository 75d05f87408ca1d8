//! The tools bound to one agent

use crate::Tool;
use std::sync::Arc;

/// Fixed, ordered set of tools
///
/// Built once per agent. Order is kept so the tool list sent to the model is
/// stable between turns. A later tool with an already-seen name replaces the
/// earlier one in its slot.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// No tools; the agent can only answer in text
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tools(tools: impl IntoIterator<Item = Arc<dyn Tool>>) -> Self {
        let mut slots: Vec<Arc<dyn Tool>> = Vec::new();
        for tool in tools {
            match slots.iter_mut().find(|t| t.name() == tool.name()) {
                Some(slot) => {
                    tracing::debug!(tool = tool.name(), "Duplicate tool name, keeping the later one");
                    *slot = tool;
                }
                None => slots.push(tool),
            }
        }
        Self { tools: slots }
    }

    /// Exact, case-sensitive lookup
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.tools.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
