//! Task definitions and outputs

use serde::{Deserialize, Serialize};

/// A unit of work for the crew
///
/// `description` and `expected_output` may contain `{{ input }}`
/// placeholders. `context` lists earlier tasks, by index, whose outputs are
/// shown to this task; when unset, a sequential crew shows all earlier
/// outputs.
#[derive(Debug, Clone)]
pub struct Task {
    description: String,
    expected_output: String,
    agent: Option<String>,
    context: Option<Vec<usize>>,
}

impl Task {
    /// Create a task with no agent and default context
    pub fn new(description: impl Into<String>, expected_output: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            expected_output: expected_output.into(),
            agent: None,
            context: None,
        }
    }

    /// Assign the task to the agent with this role
    pub fn agent(mut self, role: impl Into<String>) -> Self {
        self.agent = Some(role.into());
        self
    }

    /// Use exactly these earlier tasks as context
    pub fn context(mut self, tasks: impl IntoIterator<Item = usize>) -> Self {
        self.context = Some(tasks.into_iter().collect());
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn expected_output(&self) -> &str {
        &self.expected_output
    }

    pub fn assigned_agent(&self) -> Option<&str> {
        self.agent.as_deref()
    }

    pub fn context_tasks(&self) -> Option<&[usize]> {
        self.context.as_deref()
    }
}

/// Result of one task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOutput {
    /// Interpolated task description
    pub description: String,
    /// Interpolated expected output
    pub expected_output: String,
    /// Role of the agent that produced the output
    pub agent: String,
    /// The output text
    pub raw: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_builder() {
        let task = Task::new("{{ ticker }} 뉴스 요약", "3~5개 뉴스")
            .agent("증시 뉴스 분석가")
            .context([0]);
        assert_eq!(task.assigned_agent(), Some("증시 뉴스 분석가"));
        assert_eq!(task.context_tasks(), Some(&[0][..]));
    }

    #[test]
    fn test_default_context_is_unset() {
        assert!(Task::new("d", "e").context_tasks().is_none());
    }
}
