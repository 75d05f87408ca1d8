use async_trait::async_trait;
use crew_llm::testing::{ScriptedProvider, last_tool_result, text_response, tool_call_response};
use crew_llm::{CompletionRequest, CompletionResponse};
use crew_runtime::AgentRuntime;
use serde_json::json;
use stock_crew::crews::PLAN;
use stock_crew::prompts::{investment, news};
use stock_crew::{
    Budget, InvestmentCrew, InvestmentRequest, KeyStatistics, NewsOpinionCrew, NewsRequest,
    Perspective, QuoteSource, RiskPreference, SearchBackend, SearchHit, SectionStatus, StockConfig,
    StockError, StockToolkit,
};
use std::sync::Arc;

struct FakeSearch {
    fail: bool,
}

#[async_trait]
impl SearchBackend for FakeSearch {
    async fn search(&self, query: &str, max_results: usize) -> stock_crew::Result<Vec<SearchHit>> {
        if self.fail {
            return Err(StockError::SearchError("503 Service Unavailable".to_string()));
        }
        Ok((1..=max_results.min(3))
            .map(|i| SearchHit {
                title: format!("{query} 기사 {i}"),
                url: format!("https://news.example.com/{i}"),
                snippet: format!("{query} 관련 주요 사건 {i}"),
            })
            .collect())
    }
}

struct FakeQuotes {
    available: bool,
}

#[async_trait]
impl QuoteSource for FakeQuotes {
    async fn price(&self, _ticker: &str) -> stock_crew::Result<f64> {
        if self.available {
            Ok(189.5)
        } else {
            Err(StockError::YahooFinanceError("no data".to_string()))
        }
    }

    async fn key_statistics(&self, _ticker: &str) -> stock_crew::Result<KeyStatistics> {
        if self.available {
            Ok(KeyStatistics {
                pe: Some(31.2),
                eps: Some(6.08),
                beta: Some(1.24),
            })
        } else {
            Err(StockError::YahooFinanceError("401 Unauthorized".to_string()))
        }
    }
}

fn toolkit(search_fails: bool, quotes_available: bool) -> StockToolkit {
    StockToolkit::new(
        Arc::new(FakeSearch { fail: search_fails }),
        Arc::new(FakeQuotes {
            available: quotes_available,
        }),
        &StockConfig::default(),
    )
    .unwrap()
}

fn runtime(provider: Arc<ScriptedProvider>) -> Arc<AgentRuntime> {
    Arc::new(AgentRuntime::builder().provider(provider).build().unwrap())
}

fn is_agent(req: &CompletionRequest, role: &str) -> bool {
    req.system
        .as_deref()
        .is_some_and(|s| s.starts_with(&format!("당신은 {role}입니다.")))
}

fn first_user_text(req: &CompletionRequest) -> String {
    req.messages[0].text().unwrap_or_default()
}

/// Call `tool` on the first turn, then answer from its result
fn tool_then_answer(
    req: &CompletionRequest,
    tool: &str,
    input: serde_json::Value,
    answer: impl Fn(&str) -> String,
) -> CompletionResponse {
    match last_tool_result(req) {
        None => tool_call_response("tool-1", tool, input),
        Some((result, _)) => text_response(answer(&result)),
    }
}

fn finance_answer(result: &str) -> String {
    if result.contains("null") {
        "재무 데이터가 없어 정성적으로 평가합니다. 위험 등급 3 (보수적)".to_string()
    } else {
        format!("지표 확인: {result}")
    }
}

/// Scripted investment crew: the manager follows the plan, workers use their tools
fn investment_script(req: &CompletionRequest) -> CompletionResponse {
    if is_agent(req, investment::MANAGER) {
        let round = (req.messages.len() - 1) / 2;
        return match PLAN.get(round) {
            Some((role, _)) => tool_call_response(
                format!("delegate-{round}"),
                "delegate_work",
                json!({
                    "task": format!("{role} 담당 분석"),
                    "context": "티커 AAPL, 예산 10,000,000원, 리스크 성향 중간",
                    "coworker": role,
                }),
            ),
            None => text_response("AAPL 종합 투자 리포트: 분할 매수 권고"),
        };
    }
    if is_agent(req, investment::NEWS_RESEARCHER) {
        return tool_then_answer(req, "duckduckgo_stock_news", json!({ "query": "AAPL stock news" }), |r| {
            format!("뉴스 3줄 요약\n{r}")
        });
    }
    if is_agent(req, investment::FUNDAMENTAL_ANALYST) || is_agent(req, investment::RISK_MANAGER) {
        return tool_then_answer(req, "finance_data", json!({ "ticker": "AAPL" }), finance_answer);
    }
    text_response("| 자산 | 비중 |\n| AAPL | 40% |\n| 채권 | 60% |")
}

#[tokio::test]
async fn investment_report_has_four_sections_in_order() {
    let provider = Arc::new(ScriptedProvider::from_fn(investment_script));
    let crew = InvestmentCrew::new(runtime(provider.clone()), &toolkit(false, true)).unwrap();

    let request = InvestmentRequest::new("AAPL", Budget::new(10_000_000).unwrap(), RiskPreference::Medium).unwrap();
    let report = crew.run(&request).await.unwrap();

    assert_eq!(report.synthesis, "AAPL 종합 투자 리포트: 분할 매수 권고");
    assert_eq!(report.sections.len(), 4);
    assert_eq!(report.unavailable().count(), 0);
    let roles: Vec<&str> = report.delegations.iter().map(|d| d.coworker.as_str()).collect();
    assert_eq!(roles, PLAN.map(|(role, _)| role));

    let rendered = report.render();
    let headings = ["1. 뉴스 요약", "2. 재무 평가", "3. 위험 등급", "4. 포트폴리오 제안"];
    let positions: Vec<usize> = headings.iter().map(|h| rendered.find(h).unwrap()).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert!(rendered.contains("\"pe\":31.2"));

    let requests = provider.requests();
    let portfolio = requests
        .iter()
        .find(|r| is_agent(r, investment::PORTFOLIO_MAKER))
        .unwrap();
    assert!(portfolio
        .system
        .as_deref()
        .unwrap()
        .contains("10,000,000원 예산과 중간 리스크 성향"));

    let news_worker = requests
        .iter()
        .find(|r| is_agent(r, investment::NEWS_RESEARCHER))
        .unwrap();
    let brief = first_user_text(news_worker);
    assert!(brief.contains("### 투자 분석 관리자"));
    assert!(brief.contains("리스크 성향 중간"));
    assert!(news_worker.tools.iter().any(|t| t.name == "duckduckgo_stock_news"));

    let manager = requests.iter().find(|r| is_agent(r, investment::MANAGER)).unwrap();
    let manager_tools: Vec<&str> = manager.tools.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(manager_tools, ["delegate_work", "ask_question"]);
}

#[tokio::test]
async fn all_null_finance_data_still_completes() {
    let provider = Arc::new(ScriptedProvider::from_fn(investment_script));
    let crew = InvestmentCrew::new(runtime(provider.clone()), &toolkit(false, false)).unwrap();

    let report = crew.run(&InvestmentRequest::default()).await.unwrap();

    for role in [investment::FUNDAMENTAL_ANALYST, investment::RISK_MANAGER] {
        let section = report.sections.iter().find(|s| s.role == role).unwrap();
        match &section.status {
            SectionStatus::Completed { output } => assert!(output.contains("재무 데이터가 없어")),
            other => panic!("{role} should complete, got {other:?}"),
        }
    }

    let observed: Vec<String> = provider
        .requests()
        .iter()
        .filter(|r| is_agent(r, investment::FUNDAMENTAL_ANALYST))
        .filter_map(last_tool_result)
        .map(|(text, _)| text)
        .collect();
    assert_eq!(observed.len(), 1);
    let snapshot: serde_json::Value = serde_json::from_str(&observed[0]).unwrap();
    assert_eq!(snapshot, json!({ "price": null, "pe": null, "eps": null, "beta": null }));
}

fn news_script(req: &CompletionRequest) -> CompletionResponse {
    if is_agent(req, news::NEWS_ANALYST) {
        return tool_then_answer(req, "duckduckgo_stock_news", json!({ "query": "삼성전자 반도체" }), |r| {
            format!("뉴스 요약\n{r}")
        });
    }
    let brief = first_user_text(req);
    if brief.contains("### 증시 뉴스 분석가") && brief.contains("삼성전자 반도체 관련 주요 사건 1") {
        text_response("장기적으로 HBM 수요가 기대 요인입니다.")
    } else {
        text_response("뉴스 없이 작성한 의견")
    }
}

#[tokio::test]
async fn news_crew_feeds_summary_into_opinion() {
    let provider = Arc::new(ScriptedProvider::from_fn(news_script));
    let crew = NewsOpinionCrew::new(runtime(provider.clone()), toolkit(false, true).news).unwrap();

    let result = crew.run(&NewsRequest::default()).await.unwrap();

    assert!(result.news.starts_with("뉴스 요약"));
    assert_eq!(result.opinion, "장기적으로 HBM 수요가 기대 요인입니다.");
    assert_eq!(result.perspective, Perspective::LongTerm);

    let requests = provider.requests();
    let last_news = requests
        .iter()
        .rposition(|r| is_agent(r, news::NEWS_ANALYST))
        .unwrap();
    let first_opinion = requests
        .iter()
        .position(|r| is_agent(r, news::ADVISOR))
        .unwrap();
    assert!(last_news < first_opinion);
    assert!(requests[first_opinion]
        .system
        .as_deref()
        .unwrap()
        .contains("장기 투자자 관점에서 삼성전자 반도체 주식에 대한 의견"));
}

#[tokio::test]
async fn news_crew_search_failure_is_fatal() {
    let provider = Arc::new(ScriptedProvider::from_fn(news_script));
    let crew = NewsOpinionCrew::new(runtime(provider.clone()), toolkit(true, true).news).unwrap();

    let request = NewsRequest::new("AAPL", Perspective::ShortTerm).unwrap();
    let err = crew.run(&request).await.unwrap_err();

    assert!(matches!(err, StockError::Crew(_)));
    assert!(err.to_string().contains("duckduckgo_stock_news"));
    assert!(!provider.requests().iter().any(|r| is_agent(r, news::ADVISOR)));
}
