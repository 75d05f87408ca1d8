//! Hierarchical investment crew
//!
//! The manager is not a worker. It reaches the four specialists only
//! through `delegate_work`, in the fixed order of [`PLAN`].

use crate::error::Result;
use crate::inputs::InvestmentRequest;
use crate::prompts::investment as p;
use crate::report::InvestmentReport;
use crate::tools::StockToolkit;
use crew_prompt::Language;
use crew_runtime::AgentRuntime;
use crew_workflow::{AgentRole, Crew, DelegationPolicy, Process, Task};
use std::sync::Arc;
use tracing::info;

/// Delegation order, paired with report section titles
pub const PLAN: [(&str, &str); 4] = [
    (p::NEWS_RESEARCHER, "뉴스 요약"),
    (p::FUNDAMENTAL_ANALYST, "재무 평가"),
    (p::RISK_MANAGER, "위험 등급"),
    (p::PORTFOLIO_MAKER, "포트폴리오 제안"),
];

/// Manager plus news, fundamental, risk and portfolio workers
pub struct InvestmentCrew {
    crew: Crew,
}

impl InvestmentCrew {
    /// Build the crew
    ///
    /// News is bound to the search tool, fundamentals and risk to the
    /// finance tool; the portfolio maker and the manager have no data tools.
    pub fn new(runtime: Arc<AgentRuntime>, tools: &StockToolkit) -> Result<Self> {
        Self::with_language(runtime, tools, Language::Korean)
    }

    /// Build the crew with an explicit prompt language
    pub fn with_language(
        runtime: Arc<AgentRuntime>,
        tools: &StockToolkit,
        language: Language,
    ) -> Result<Self> {
        let workers = [
            AgentRole::new(p::NEWS_RESEARCHER, p::NEWS_RESEARCHER_GOAL, p::NEWS_RESEARCHER_BACKSTORY)
                .with_tool(tools.news.clone()),
            AgentRole::new(
                p::FUNDAMENTAL_ANALYST,
                p::FUNDAMENTAL_ANALYST_GOAL,
                p::FUNDAMENTAL_ANALYST_BACKSTORY,
            )
            .with_tool(tools.finance.clone()),
            AgentRole::new(p::RISK_MANAGER, p::RISK_MANAGER_GOAL, p::RISK_MANAGER_BACKSTORY)
                .with_tool(tools.finance.clone()),
            AgentRole::new(p::PORTFOLIO_MAKER, p::PORTFOLIO_MAKER_GOAL, p::PORTFOLIO_MAKER_BACKSTORY),
        ];
        let manager =
            AgentRole::new(p::MANAGER, p::MANAGER_GOAL, p::MANAGER_BACKSTORY).allow_delegation(true);

        let crew = Crew::builder()
            .agents(workers)
            .task(Task::new(p::REPORT_TASK, p::REPORT_TASK_OUTPUT))
            .process(Process::hierarchical_ordered(
                manager,
                DelegationPolicy::ordered(PLAN.map(|(role, _)| role)),
            ))
            .runtime(runtime)
            .language(language)
            .build()?;

        Ok(Self { crew })
    }

    /// Run the manager task and assemble the report
    pub async fn run(&self, request: &InvestmentRequest) -> Result<InvestmentReport> {
        info!(
            ticker = %request.ticker,
            budget = request.budget.amount(),
            risk = %request.risk,
            "Running investment crew"
        );
        let output = self.crew.kickoff(request.to_inputs()).await?;
        Ok(InvestmentReport::from_output(request, output, &PLAN))
    }
}
