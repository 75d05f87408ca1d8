//! Command-line interface for the stock crews
//!
//! # Usage
//!
//! ```bash
//! # Provider settings (a .env file in the working directory also works)
//! export OPENAI_API_KEY="sk-..."
//! export CREW_MODEL="gpt-4o-mini"
//!
//! stock-crew news "삼성전자 반도체" --perspective short
//! stock-crew invest AAPL --budget 10,000,000 --risk 중간
//! stock-crew lookup Apple
//! ```

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use crew_llm::providers::{OpenAIConfig, OpenAIProvider};
use crew_prompt::Language;
use crew_runtime::{AgentRuntime, ExecutorEventHandler, RuntimeConfig};
use serde_json::Value;
use std::sync::Arc;
use stock_crew::inputs::{DEFAULT_COMPANY, DEFAULT_KEYWORD, DEFAULT_TICKER};
use stock_crew::{
    Budget, InvestmentCrew, InvestmentReport, InvestmentRequest, NewsOpinionCrew, NewsRequest,
    Perspective, RiskPreference, SectionStatus, StockConfig, StockToolkit, lookup_url,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "stock-crew", version)]
#[command(about = "Stock news and investment analysis with agent crews", long_about = None)]
struct Cli {
    /// Print each tool call as agents make it
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize recent news, then write an investment opinion
    News {
        /// Ticker or keyword to search for
        #[arg(default_value = DEFAULT_KEYWORD)]
        keyword: String,

        /// Investor perspective: long or short
        #[arg(short, long, default_value_t = Perspective::LongTerm)]
        perspective: Perspective,
    },

    /// Run the manager-led investment analysis
    Invest {
        /// Yahoo Finance ticker
        #[arg(default_value = DEFAULT_TICKER)]
        ticker: String,

        /// Budget in KRW, 100,000 to 1,000,000,000 in steps of 100,000
        #[arg(short, long, default_value_t = Budget::default())]
        budget: Budget,

        /// Risk preference: low, medium or high
        #[arg(short, long, default_value_t = RiskPreference::Medium)]
        risk: RiskPreference,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a Yahoo Finance ticker lookup link for a company name
    Lookup {
        #[arg(default_value = DEFAULT_COMPANY)]
        company: String,
    },
}

/// Tool progress on stderr, enabled by `--verbose`
struct ConsoleProgress;

#[async_trait]
impl ExecutorEventHandler for ConsoleProgress {
    async fn on_tool_start(&self, agent: &str, tool: &str, input: &Value) {
        eprintln!("  → [{agent}] {tool} {input}");
    }

    async fn on_tool_done(
        &self,
        agent: &str,
        tool: &str,
        result: std::result::Result<&str, &str>,
        duration_ms: u64,
    ) {
        match result {
            Ok(_) => eprintln!("  ✓ [{agent}] {tool} ({duration_ms}ms)"),
            Err(e) => eprintln!("  ✗ [{agent}] {tool}: {e}"),
        }
    }

    async fn on_complete(&self, agent: &str, output: &str) {
        eprintln!("  ● [{agent}] done ({} chars)", output.chars().count());
    }
}

fn build_runtime(app: &crew_utils::Config, verbose: bool) -> Result<Arc<AgentRuntime>> {
    let provider_config =
        OpenAIConfig::from_app_config(app).context("LLM provider is not configured")?;
    let provider = Arc::new(OpenAIProvider::with_config(provider_config)?);

    let mut builder = AgentRuntime::builder()
        .provider(provider)
        .config(RuntimeConfig::from_app_config(app));
    if verbose {
        builder = builder.event_handler(Arc::new(ConsoleProgress));
    }
    Ok(Arc::new(builder.build()?))
}

fn step_table(report: &InvestmentReport) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Section", "Agent", "Status"]);

    for (i, section) in report.sections.iter().enumerate() {
        let status = match &section.status {
            SectionStatus::Completed { output } => format!("completed ({} chars)", output.chars().count()),
            SectionStatus::Failed { reason } => format!("failed: {reason}"),
            SectionStatus::Missing => "not delegated".to_string(),
        };
        table.add_row(vec![
            (i + 1).to_string(),
            section.title.clone(),
            section.role.clone(),
            status,
        ]);
    }
    table
}

async fn run_news(
    runtime: Arc<AgentRuntime>,
    toolkit: StockToolkit,
    language: Language,
    keyword: &str,
    perspective: Perspective,
) -> Result<()> {
    let request = NewsRequest::new(keyword, perspective)?;
    let crew = NewsOpinionCrew::with_language(runtime, toolkit.news, language)?;

    let result = crew.run(&request).await.context("news crew failed")?;
    info!(run_id = %result.run_id, "News crew finished");
    println!("{}", result.render());
    Ok(())
}

async fn run_invest(
    runtime: Arc<AgentRuntime>,
    toolkit: StockToolkit,
    language: Language,
    request: InvestmentRequest,
    json: bool,
) -> Result<()> {
    let crew = InvestmentCrew::with_language(runtime, &toolkit, language)?;

    let report = crew.run(&request).await.context("investment crew failed")?;
    info!(
        run_id = %report.run_id,
        delegations = report.delegations.len(),
        unavailable = report.unavailable().count(),
        "Investment crew finished"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.render());
        eprintln!("{}", step_table(&report));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let app = crew_utils::Config::from_env()?;
    crew_utils::init_tracing(&app, if cli.verbose { "info" } else { "warn" });

    if let Command::Lookup { company } = &cli.command {
        println!("{}", lookup_url(company)?);
        return Ok(());
    }

    info!(model = %app.model, environment = %app.environment, "Starting stock-crew");
    let language = Language::from_code(&app.language);
    let runtime = build_runtime(&app, cli.verbose)?;
    let toolkit = StockToolkit::live(&StockConfig::from_env()?)?;

    match cli.command {
        Command::News {
            keyword,
            perspective,
        } => run_news(runtime, toolkit, language, &keyword, perspective).await,
        Command::Invest {
            ticker,
            budget,
            risk,
            json,
        } => {
            let request = InvestmentRequest::new(&ticker, budget, risk)?;
            run_invest(runtime, toolkit, language, request, json).await
        }
        Command::Lookup { .. } => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_invest_defaults() {
        let cli = Cli::try_parse_from(["stock-crew", "invest"]).unwrap();
        match cli.command {
            Command::Invest {
                ticker,
                budget,
                risk,
                json,
            } => {
                assert_eq!(ticker, "AAPL");
                assert_eq!(budget, Budget::default());
                assert_eq!(risk, RiskPreference::Medium);
                assert!(!json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_invest_rejects_off_step_budget() {
        assert!(Cli::try_parse_from(["stock-crew", "invest", "--budget", "150,000"]).is_err());
        let cli =
            Cli::try_parse_from(["stock-crew", "-v", "invest", "MSFT", "-b", "5,000,000", "-r", "높음"])
                .unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Command::Invest { budget, risk: RiskPreference::High, .. } if budget.amount() == 5_000_000
        ));
    }

    #[test]
    fn test_news_perspective() {
        let cli = Cli::try_parse_from(["stock-crew", "news", "--perspective", "short"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::News { ref keyword, perspective: Perspective::ShortTerm } if keyword == DEFAULT_KEYWORD
        ));
    }
}
