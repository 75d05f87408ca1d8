//! Sequential news and opinion crew

use crate::error::{Result, StockError};
use crate::inputs::NewsRequest;
use crate::prompts::news::{
    ADVISOR, ADVISOR_BACKSTORY, ADVISOR_GOAL, NEWS_ANALYST, NEWS_ANALYST_BACKSTORY,
    NEWS_ANALYST_GOAL, NEWS_TASK, NEWS_TASK_OUTPUT, OPINION_TASK, OPINION_TASK_OUTPUT,
};
use crate::report::NewsOpinion;
use crew_prompt::Language;
use crew_runtime::AgentRuntime;
use crew_tools::Tool;
use crew_workflow::{AgentRole, Crew, Process, Task};
use std::sync::Arc;
use tracing::info;

/// News analyst, then investment advisor, in that order
pub struct NewsOpinionCrew {
    crew: Crew,
}

impl NewsOpinionCrew {
    /// Build the crew; `search` is bound to the news analyst only
    pub fn new(runtime: Arc<AgentRuntime>, search: Arc<dyn Tool>) -> Result<Self> {
        Self::with_language(runtime, search, Language::Korean)
    }

    /// Build the crew with an explicit prompt language
    pub fn with_language(
        runtime: Arc<AgentRuntime>,
        search: Arc<dyn Tool>,
        language: Language,
    ) -> Result<Self> {
        let analyst =
            AgentRole::new(NEWS_ANALYST, NEWS_ANALYST_GOAL, NEWS_ANALYST_BACKSTORY).with_tool(search);
        let advisor = AgentRole::new(ADVISOR, ADVISOR_GOAL, ADVISOR_BACKSTORY);

        let crew = Crew::builder()
            .agent(analyst)
            .agent(advisor)
            .task(Task::new(NEWS_TASK, NEWS_TASK_OUTPUT).agent(NEWS_ANALYST))
            .task(
                Task::new(OPINION_TASK, OPINION_TASK_OUTPUT)
                    .agent(ADVISOR)
                    .context([0]),
            )
            .process(Process::Sequential)
            .runtime(runtime)
            .language(language)
            .build()?;

        Ok(Self { crew })
    }

    /// Run both tasks
    pub async fn run(&self, request: &NewsRequest) -> Result<NewsOpinion> {
        info!(
            keyword = %request.keyword,
            perspective = %request.perspective,
            "Running news and opinion crew"
        );
        let output = self.crew.kickoff(request.to_inputs()).await?;

        let [news, opinion] = output.tasks_output.as_slice() else {
            return Err(StockError::Other(format!(
                "expected 2 task outputs, got {}",
                output.tasks_output.len()
            )));
        };

        Ok(NewsOpinion {
            run_id: output.run_id.clone(),
            keyword: request.keyword.clone(),
            perspective: request.perspective,
            news: news.raw.clone(),
            opinion: opinion.raw.clone(),
        })
    }
}
