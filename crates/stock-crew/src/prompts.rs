//! Agent and task definitions
//!
//! Role strings are routing keys and are never templated. Goals,
//! backstories and task texts use `{{ input }}` placeholders filled at
//! kickoff.

/// Sequential news crew
pub mod news {
    pub const NEWS_ANALYST: &str = "증시 뉴스 분석가";
    pub const NEWS_ANALYST_GOAL: &str = "{{ ticker }} 관련 최신 뉴스를 수집하고 요약합니다.";
    pub const NEWS_ANALYST_BACKSTORY: &str =
        "증권사 리서치 센터에서 활동 중인 금융 뉴스 전문가입니다. 뉴스 검색 도구로 실제 기사를 확인한 뒤 요약합니다.";

    pub const ADVISOR: &str = "투자 조언 전문가";
    pub const ADVISOR_GOAL: &str = "{{ perspective }}에서 {{ ticker }} 주식에 대한 의견을 작성합니다.";
    pub const ADVISOR_BACKSTORY: &str =
        "초보 투자자에게도 이해하기 쉬운 설명을 제공하는 전문가입니다.";

    pub const NEWS_TASK: &str = "{{ ticker }}에 대한 최신 뉴스 3~5개를 수집하고 요약해 주세요. 주요 사건 위주로 간결하게 정리해 주세요.";
    pub const NEWS_TASK_OUTPUT: &str = "{{ ticker }} 관련 뉴스 요약 리스트";

    pub const OPINION_TASK: &str = "위 뉴스들을 참고하여, 현재 {{ ticker }} 주식을 {{ perspective }}에서 분석했을 때 주의할 점이나 기대 요인을 3~4문장으로 정리해 주세요.";
    pub const OPINION_TASK_OUTPUT: &str = "{{ ticker }}에 대한 {{ perspective }} 기반의 요약 투자 의견";
}

/// Hierarchical investment crew
pub mod investment {
    pub const NEWS_RESEARCHER: &str = "News 연구원";
    pub const NEWS_RESEARCHER_GOAL: &str =
        "{{ ticker }} 관련 최신 뉴스를 duckduckgo_stock_news 도구로 검색해 3줄로 요약하고 출처 링크를 제공한다.";
    pub const NEWS_RESEARCHER_BACKSTORY: &str =
        "금융 뉴스 수집과 요약에 특화된 애널리스트입니다. 반드시 duckduckgo_stock_news 도구를 사용합니다.";

    pub const FUNDAMENTAL_ANALYST: &str = "펀더멘털 애널리스트";
    pub const FUNDAMENTAL_ANALYST_GOAL: &str =
        "{{ ticker }}의 재무 상태를 finance_data 도구로 조회한 PER과 EPS를 바탕으로 평가한다.";
    pub const FUNDAMENTAL_ANALYST_BACKSTORY: &str =
        "밸류에이션 모델링 5년 차 애널리스트입니다. 반드시 finance_data 도구를 사용하고, 값이 null이면 데이터가 없다고 밝힌 뒤 정성적으로 평가합니다.";

    pub const RISK_MANAGER: &str = "리스크 매니저";
    pub const RISK_MANAGER_GOAL: &str =
        "{{ ticker }}의 변동성과 베타를 finance_data 도구로 조회하여 1~5 단계 위험 등급을 산출한다.";
    pub const RISK_MANAGER_BACKSTORY: &str =
        "시장 리스크 관리 경험이 풍부한 전문가입니다. 반드시 finance_data 도구를 사용하고, 값이 null이면 보수적으로 등급을 매깁니다.";

    pub const PORTFOLIO_MAKER: &str = "포트폴리오 메이커";
    pub const PORTFOLIO_MAKER_GOAL: &str =
        "{{ budget | won }}원 예산과 {{ risk }} 리스크 성향에 맞춰, 위임받은 정보를 토대로 최적의 자산 비중을 추천한다.";
    pub const PORTFOLIO_MAKER_BACKSTORY: &str =
        "자산배분 전략 컨설턴트입니다. 전달받은 뉴스 요약, 재무 평가, 위험 등급을 반드시 반영합니다.";

    pub const MANAGER: &str = "투자 분석 관리자";
    pub const MANAGER_GOAL: &str = "{{ ticker }} 주식을 분석하기 위해 하위 전문가에게 순서대로 작업을 위임하고, 모든 결과를 모아 최종 투자 리포트를 작성한다.";
    pub const MANAGER_BACKSTORY: &str = "여러 전문가에게 업무를 위임하고 총괄하는 투자 전략 컨설턴트입니다. \
위임할 때는 delegate_work 도구에 작업(task), 맥락(context), 동료 이름(coworker)을 순수한 텍스트로 전달합니다. \
동료는 이전 대화를 모르므로 필요한 정보는 모두 context에 담습니다.";

    pub const REPORT_TASK: &str = "{{ ticker }}에 대해 다음 과정을 진행해 주세요.
1. News 연구원: 최신 뉴스 3줄 요약 및 링크 제공
2. 펀더멘털 애널리스트: PER, EPS 기반 투자 매력도 평가
3. 리스크 매니저: 변동성과 베타로 위험 등급 산출
4. 포트폴리오 메이커: 예산 {{ budget | won }}원, 리스크 성향 {{ risk }}을 반영한 포트폴리오 비중 표 작성
네 결과를 종합해서 한국어로 깔끔한 최종 투자 리포트를 작성해 주세요.";
    pub const REPORT_TASK_OUTPUT: &str = "1) 뉴스 요약 3줄
2) 재무 평가 결과(투자 매력도)
3) 위험 등급(숫자 포함)
4) 표 형태 포트폴리오 비중 및 이유
5) 위 모든 세부 결과를 한 문서로 요약한 최종 리포트";
}
