//! [`crew_core::Agent`] over an [`AgentExecutor`]

use crate::executor::AgentExecutor;
use async_trait::async_trait;
use crew_core::{Agent, Context, Result};
use tracing::Instrument;

/// One crew member: a role string plus the tool loop that answers for it
pub struct RoleAgent {
    role: String,
    executor: AgentExecutor,
}

impl RoleAgent {
    pub fn new(role: impl Into<String>, executor: AgentExecutor) -> Self {
        Self {
            role: role.into(),
            executor,
        }
    }
}

#[async_trait]
impl Agent for RoleAgent {
    async fn process(&self, input: String, context: &mut Context) -> Result<String> {
        context.set_current_role(&self.role);
        let span = tracing::info_span!(
            "agent",
            role = %self.role,
            run_id = context.run_id().unwrap_or("-")
        );
        self.executor.run(input).instrument(span).await
    }

    fn name(&self) -> &str {
        &self.role
    }
}
