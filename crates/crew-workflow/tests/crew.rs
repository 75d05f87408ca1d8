use crew_llm::testing::{ScriptedProvider, last_tool_result, text_response, tool_call_response};
use crew_llm::{CompletionRequest, CompletionResponse};
use crew_runtime::AgentRuntime;
use crew_workflow::{
    AgentRole, Crew, CrewError, DelegationOutcome, DelegationPolicy, Process, Task,
};
use serde_json::json;
use std::sync::Arc;

const MANAGER: &str = "투자 분석 관리자";
const WORKERS: [&str; 4] = ["News 연구원", "펀더멘털 애널리스트", "리스크 매니저", "포트폴리오 메이커"];

fn runtime(provider: Arc<ScriptedProvider>) -> Arc<AgentRuntime> {
    Arc::new(AgentRuntime::builder().provider(provider).build().unwrap())
}

fn system_of(req: &CompletionRequest) -> &str {
    req.system.as_deref().unwrap_or_default()
}

fn is_agent(req: &CompletionRequest, role: &str) -> bool {
    system_of(req).starts_with(&format!("당신은 {role}입니다."))
}

fn user_text(req: &CompletionRequest) -> String {
    req.messages[0].text().unwrap_or_default()
}

fn manager_role() -> AgentRole {
    AgentRole::new(MANAGER, "{{ ticker }} 투자 보고서 작성", "팀을 이끄는 관리자").allow_delegation(true)
}

fn workers() -> Vec<AgentRole> {
    WORKERS
        .iter()
        .map(|role| AgentRole::new(*role, format!("{role} 분석"), "전문가"))
        .collect()
}

fn delegate(id: &str, coworker: &str) -> CompletionResponse {
    tool_call_response(
        id,
        "delegate_work",
        json!({ "task": format!("{coworker} 작업"), "context": "티커 AAPL", "coworker": coworker }),
    )
}

/// Manager that delegates to `targets` one per round, then answers
fn manager_script(targets: Vec<String>, final_answer: &'static str) -> impl Fn(&CompletionRequest) -> CompletionResponse {
    move |req| {
        let round = (req.messages.len() - 1) / 2;
        match targets.get(round) {
            Some(target) => delegate(&format!("call-{round}"), target),
            None => text_response(final_answer),
        }
    }
}

fn hierarchical_crew(provider: Arc<ScriptedProvider>, policy: DelegationPolicy) -> Crew {
    Crew::builder()
        .agents(workers())
        .task(Task::new("{{ ticker }} 종합 투자 보고서", "네 부분으로 구성된 보고서"))
        .process(Process::hierarchical_ordered(manager_role(), policy))
        .runtime(runtime(provider))
        .build()
        .unwrap()
}

#[tokio::test]
async fn sequential_feeds_news_into_opinion() {
    let provider = Arc::new(ScriptedProvider::from_fn(|req| {
        if is_agent(req, "증시 뉴스 분석가") {
            text_response("뉴스: AAPL 실적 호조")
        } else if user_text(req).contains("뉴스: AAPL 실적 호조") {
            text_response("의견: 매수")
        } else {
            text_response("의견: 정보 부족")
        }
    }));

    let crew = Crew::builder()
        .agent(AgentRole::new("증시 뉴스 분석가", "{{ ticker }} 뉴스 수집", "뉴스 전문가"))
        .agent(AgentRole::new("투자 조언 전문가", "{{ perspective }}에서 조언", "투자 전문가"))
        .task(Task::new("{{ ticker }} 최신 뉴스 요약", "핵심 뉴스 3개").agent("증시 뉴스 분석가"))
        .task(Task::new("투자 의견 제시", "매수/매도/보유 의견").agent("투자 조언 전문가"))
        .runtime(runtime(provider.clone()))
        .build()
        .unwrap();

    let output = crew
        .kickoff(json!({ "ticker": "AAPL", "perspective": "장기 투자자 관점" }))
        .await
        .unwrap();

    assert_eq!(output.tasks_output.len(), 2);
    assert_eq!(output.tasks_output[0].raw, "뉴스: AAPL 실적 호조");
    assert_eq!(output.tasks_output[1].raw, "의견: 매수");
    assert_eq!(output.raw, "의견: 매수");
    assert!(output.delegations.is_empty());

    let requests = provider.requests();
    assert_eq!(requests.len(), 2);
    assert!(is_agent(&requests[0], "증시 뉴스 분석가"));
    assert!(user_text(&requests[0]).contains("AAPL 최신 뉴스 요약"));
    assert!(system_of(&requests[1]).contains("장기 투자자 관점에서 조언"));
    assert!(user_text(&requests[1]).contains("### 증시 뉴스 분석가"));
}

#[tokio::test]
async fn explicit_empty_context_hides_earlier_outputs() {
    let provider = Arc::new(ScriptedProvider::from_fn(|req| {
        text_response(format!("seen context: {}", user_text(req).contains("###")))
    }));

    let crew = Crew::builder()
        .agent(AgentRole::new("a", "g", "b"))
        .task(Task::new("first", "x").agent("a"))
        .task(Task::new("second", "y").agent("a").context([]))
        .task(Task::new("third", "z").agent("a"))
        .runtime(runtime(provider))
        .build()
        .unwrap();

    let output = crew.kickoff(json!({})).await.unwrap();
    let seen: Vec<&str> = output.tasks_output.iter().map(|o| o.raw.as_str()).collect();
    assert_eq!(seen, ["seen context: false", "seen context: false", "seen context: true"]);
}

#[tokio::test]
async fn hierarchical_follows_plan() {
    let plan: Vec<String> = WORKERS.iter().map(|r| r.to_string()).collect();
    let manager = manager_script(plan.clone(), "최종 보고서");
    let provider = Arc::new(ScriptedProvider::from_fn(move |req| {
        if is_agent(req, MANAGER) {
            return manager(req);
        }
        let role = WORKERS.iter().find(|r| is_agent(req, r)).copied().unwrap_or("?");
        text_response(format!("{role} 결과"))
    }));

    let crew = hierarchical_crew(provider.clone(), DelegationPolicy::Ordered(plan));
    let output = crew.kickoff(json!({ "ticker": "AAPL" })).await.unwrap();

    assert_eq!(output.raw, "최종 보고서");
    assert_eq!(output.tasks_output[0].agent, MANAGER);
    let routed: Vec<&str> = output.delegations.iter().map(|r| r.coworker.as_str()).collect();
    assert_eq!(routed, WORKERS);
    for role in WORKERS {
        assert_eq!(
            output.delegation_to(role).and_then(|r| r.output()),
            Some(format!("{role} 결과").as_str())
        );
    }

    let manager_request = provider.requests().into_iter().find(|r| is_agent(r, MANAGER)).unwrap();
    assert!(system_of(&manager_request).contains("1. News 연구원"));
    let delegate_tool = manager_request
        .tools
        .iter()
        .find(|t| t.name == "delegate_work")
        .unwrap();
    assert_eq!(
        delegate_tool.input_schema["properties"]["coworker"]["enum"],
        json!(WORKERS)
    );
}

#[tokio::test]
async fn near_miss_coworker_never_reaches_a_worker() {
    let near_misses = [
        "news 연구원",
        "NEWS 연구원",
        "News연구원",
        " News 연구원",
        "News 연구원 ",
        "News\t연구원",
        "News 연구원.",
        "Nwes 연구원",
        "리스크 매니져",
        "포트폴리오메이커",
        "펀더멘탈 애널리스트",
        "Portfolio Maker",
    ];

    for name in near_misses {
        let manager = manager_script(vec![name.to_string()], "동료 없이 작성한 보고서");
        let provider = Arc::new(ScriptedProvider::from_fn(move |req| {
            if is_agent(req, MANAGER) {
                manager(req)
            } else {
                text_response("worker ran")
            }
        }));

        let crew = hierarchical_crew(provider.clone(), DelegationPolicy::Free);
        let output = crew.kickoff(json!({ "ticker": "AAPL" })).await.unwrap();

        let requests = provider.requests();
        assert!(
            requests.iter().all(|r| is_agent(r, MANAGER)),
            "{name:?} reached a worker"
        );
        assert_eq!(output.delegations.len(), 1);
        assert_eq!(output.delegations[0].coworker, name);
        assert!(matches!(
            output.delegations[0].outcome,
            DelegationOutcome::Rejected { .. }
        ));

        let (observation, is_error) = last_tool_result(requests.last().unwrap()).unwrap();
        assert!(is_error);
        assert!(observation.contains("News 연구원, 펀더멘털 애널리스트, 리스크 매니저, 포트폴리오 메이커"));
    }
}

#[tokio::test]
async fn ordered_plan_rejects_skipped_step() {
    let manager = manager_script(
        vec!["리스크 매니저".to_string(), "News 연구원".to_string()],
        "보고서",
    );
    let provider = Arc::new(ScriptedProvider::from_fn(move |req| {
        if is_agent(req, MANAGER) {
            manager(req)
        } else {
            text_response("결과")
        }
    }));

    let plan = DelegationPolicy::ordered(WORKERS);
    let output = hierarchical_crew(provider.clone(), plan)
        .kickoff(json!({ "ticker": "AAPL" }))
        .await
        .unwrap();

    assert!(matches!(output.delegations[0].outcome, DelegationOutcome::Rejected { .. }));
    assert!(matches!(output.delegations[1].outcome, DelegationOutcome::Completed { .. }));
    assert!(!provider.requests().iter().any(|r| is_agent(r, "리스크 매니저")));
    assert_eq!(
        crew_workflow::missing_planned(&WORKERS.map(String::from), &output.delegations),
        ["펀더멘털 애널리스트", "리스크 매니저", "포트폴리오 메이커"]
    );
}

#[tokio::test]
async fn worker_failure_is_recorded_and_manager_continues() {
    let plan: Vec<String> = WORKERS.iter().map(|r| r.to_string()).collect();
    let manager = manager_script(plan.clone(), "부분 정보로 작성한 보고서");
    let provider = Arc::new(ScriptedProvider::from_fn(move |req| {
        if is_agent(req, MANAGER) {
            manager(req)
        } else if is_agent(req, "펀더멘털 애널리스트") {
            // empty answer fails the worker
            text_response("")
        } else {
            text_response("결과")
        }
    }));

    let output = hierarchical_crew(provider, DelegationPolicy::Ordered(plan))
        .kickoff(json!({ "ticker": "AAPL" }))
        .await
        .unwrap();

    assert_eq!(output.raw, "부분 정보로 작성한 보고서");
    assert_eq!(output.delegations.len(), 4);
    assert!(matches!(output.delegations[1].outcome, DelegationOutcome::Failed { .. }));
    assert!(output.delegation_to("리스크 매니저").is_some());
}

#[test]
fn manager_listed_as_worker_is_rejected() {
    let provider = Arc::new(ScriptedProvider::new(Vec::new()));
    let result = Crew::builder()
        .agents(workers())
        .agent(AgentRole::new(MANAGER, "g", "b"))
        .task(Task::new("d", "e"))
        .process(Process::hierarchical(manager_role()))
        .runtime(runtime(provider))
        .build();
    assert!(matches!(result, Err(CrewError::ManagerInWorkers(role)) if role == MANAGER));
}

#[test]
fn build_validation() {
    let provider = Arc::new(ScriptedProvider::new(Vec::new()));
    let rt = runtime(provider);

    let forward_context = Crew::builder()
        .agent(AgentRole::new("a", "g", "b"))
        .task(Task::new("first", "x").agent("a").context([1]))
        .task(Task::new("second", "y").agent("a"))
        .runtime(rt.clone())
        .build();
    assert!(matches!(
        forward_context,
        Err(CrewError::InvalidContext { task: 0, reference: 1 })
    ));

    let unknown_agent = Crew::builder()
        .agent(AgentRole::new("a", "g", "b"))
        .task(Task::new("d", "e").agent("b"))
        .runtime(rt.clone())
        .build();
    assert!(matches!(unknown_agent, Err(CrewError::MissingAgent { .. })));

    let unknown_plan = Crew::builder()
        .agents(workers())
        .task(Task::new("d", "e"))
        .process(Process::hierarchical_ordered(
            manager_role(),
            DelegationPolicy::ordered(["News 연구원", "Risk Manager"]),
        ))
        .runtime(rt.clone())
        .build();
    assert!(matches!(unknown_plan, Err(CrewError::UnknownPlanRole(r)) if r == "Risk Manager"));

    let no_delegation = Crew::builder()
        .agents(workers())
        .task(Task::new("d", "e"))
        .process(Process::hierarchical(AgentRole::new(MANAGER, "g", "b")))
        .runtime(rt.clone())
        .build();
    assert!(matches!(no_delegation, Err(CrewError::ManagerCannotDelegate(_))));

    assert!(matches!(
        Crew::builder().runtime(rt).build(),
        Err(CrewError::EmptyCrew)
    ));
}

#[tokio::test]
async fn kickoff_input_errors() {
    let provider = Arc::new(ScriptedProvider::new(vec![text_response("unused")]));
    let crew = Crew::builder()
        .agent(AgentRole::new("a", "g", "b"))
        .task(Task::new("{{ ticker }} 분석", "e").agent("a"))
        .runtime(runtime(provider.clone()))
        .build()
        .unwrap();

    assert!(matches!(
        crew.kickoff(json!(["AAPL"])).await,
        Err(CrewError::InvalidInputs)
    ));
    assert!(matches!(
        crew.kickoff(json!({ "budget": 10_000_000 })).await,
        Err(CrewError::Interpolation(_))
    ));
    assert_eq!(provider.call_count(), 0);
}
