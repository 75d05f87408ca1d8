//! Crew results as user-facing reports

use crate::inputs::{Budget, InvestmentRequest, Perspective, RiskPreference};
use chrono::{DateTime, Utc};
use crew_workflow::{CrewOutput, DelegationKind, DelegationOutcome, DelegationRecord, TaskOutput};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// News summary and opinion from the sequential crew
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsOpinion {
    pub run_id: String,
    pub keyword: String,
    pub perspective: Perspective,
    pub news: String,
    pub opinion: String,
}

impl NewsOpinion {
    /// Markdown with a news section and an opinion section
    pub fn render(&self) -> String {
        format!(
            "# {keyword} 분석 ({perspective})\n\n## 뉴스 요약\n\n{news}\n\n## 투자 의견\n\n{opinion}\n",
            keyword = self.keyword,
            perspective = self.perspective,
            news = self.news.trim(),
            opinion = self.opinion.trim(),
        )
    }
}

/// What happened to one planned step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SectionStatus {
    Completed { output: String },
    Failed { reason: String },
    /// The manager never delegated this step
    Missing,
}

/// One labeled report section, tied to the worker that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSection {
    pub title: String,
    pub role: String,
    pub status: SectionStatus,
}

impl ReportSection {
    fn body(&self) -> String {
        match &self.status {
            SectionStatus::Completed { output } => output.trim().to_string(),
            SectionStatus::Failed { reason } => {
                format!("_결과 없음: {}의 작업이 실패했습니다 ({reason})_", self.role)
            }
            SectionStatus::Missing => {
                format!("_결과 없음: {}에게 작업이 위임되지 않았습니다_", self.role)
            }
        }
    }
}

/// Consolidated report from the hierarchical crew
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentReport {
    pub run_id: String,
    pub ticker: String,
    pub budget: Budget,
    pub risk: RiskPreference,
    /// One per planned step, in plan order
    pub sections: Vec<ReportSection>,
    /// Manager's final report
    pub synthesis: String,
    /// Per-task outputs
    pub steps: Vec<TaskOutput>,
    /// Every manager request, including rejected ones
    pub delegations: Vec<DelegationRecord>,
    pub generated_at: DateTime<Utc>,
}

impl InvestmentReport {
    /// Build sections from delegation records
    ///
    /// `plan` pairs worker roles with section titles. Each section takes the
    /// latest work delegation that reached its worker.
    pub fn from_output(request: &InvestmentRequest, output: CrewOutput, plan: &[(&str, &str)]) -> Self {
        let sections = plan
            .iter()
            .map(|(role, title)| ReportSection {
                title: (*title).to_string(),
                role: (*role).to_string(),
                status: section_status(&output.delegations, role),
            })
            .collect();

        Self {
            run_id: output.run_id,
            ticker: request.ticker.clone(),
            budget: request.budget,
            risk: request.risk,
            sections,
            synthesis: output.raw,
            steps: output.tasks_output,
            delegations: output.delegations,
            generated_at: Utc::now(),
        }
    }

    /// Sections that have no output
    pub fn unavailable(&self) -> impl Iterator<Item = &ReportSection> {
        self.sections
            .iter()
            .filter(|s| !matches!(s.status, SectionStatus::Completed { .. }))
    }

    /// Markdown: numbered sections in plan order, then the final report
    pub fn render(&self) -> String {
        let mut out = format!(
            "# {} 투자 분석 리포트\n\n- 예산: {}\n- 리스크 성향: {}\n- 작성 시각: {}\n",
            self.ticker,
            self.budget,
            self.risk,
            self.generated_at.format("%Y-%m-%d %H:%M UTC"),
        );

        for (i, section) in self.sections.iter().enumerate() {
            let _ = write!(
                out,
                "\n## {}. {} ({})\n\n{}\n",
                i + 1,
                section.title,
                section.role,
                section.body()
            );
        }

        let _ = write!(out, "\n## 최종 투자 리포트\n\n{}\n", self.synthesis.trim());
        out
    }
}

fn section_status(records: &[DelegationRecord], role: &str) -> SectionStatus {
    records
        .iter()
        .rev()
        .filter(|r| r.kind == DelegationKind::Work && r.coworker == role)
        .find_map(|r| match &r.outcome {
            DelegationOutcome::Completed { output } => Some(SectionStatus::Completed {
                output: output.clone(),
            }),
            DelegationOutcome::Failed { reason } => Some(SectionStatus::Failed {
                reason: reason.clone(),
            }),
            DelegationOutcome::Rejected { .. } => None,
        })
        .unwrap_or(SectionStatus::Missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crews::PLAN;

    fn work(coworker: &str, outcome: DelegationOutcome) -> DelegationRecord {
        DelegationRecord {
            kind: DelegationKind::Work,
            coworker: coworker.to_string(),
            task: "작업".to_string(),
            context: String::new(),
            outcome,
        }
    }

    fn completed(text: &str) -> DelegationOutcome {
        DelegationOutcome::Completed {
            output: text.to_string(),
        }
    }

    fn output(delegations: Vec<DelegationRecord>) -> CrewOutput {
        CrewOutput {
            run_id: "run-1".to_string(),
            raw: "최종 리포트 본문".to_string(),
            tasks_output: Vec::new(),
            delegations,
        }
    }

    #[test]
    fn test_sections_follow_plan_order() {
        // delegation order differs from plan order; sections do not
        let report = InvestmentReport::from_output(
            &InvestmentRequest::default(),
            output(vec![
                work("리스크 매니저", completed("위험 등급 3")),
                work("News 연구원", completed("뉴스 3줄")),
                work("포트폴리오 메이커", completed("| 주식 | 60% |")),
                work("펀더멘털 애널리스트", completed("PER 31")),
            ]),
            &PLAN,
        );

        let rendered = report.render();
        let positions: Vec<usize> = ["1. 뉴스 요약", "2. 재무 평가", "3. 위험 등급", "4. 포트폴리오 제안", "최종 투자 리포트"]
            .iter()
            .map(|h| rendered.find(h).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(rendered.contains("10,000,000원"));
        assert!(rendered.contains("리스크 성향: 중간"));
        assert_eq!(report.unavailable().count(), 0);
    }

    #[test]
    fn test_missing_and_failed_sections_are_marked() {
        let report = InvestmentReport::from_output(
            &InvestmentRequest::default(),
            output(vec![
                work("News 연구원", completed("뉴스 3줄")),
                work(
                    "펀더멘털 애널리스트",
                    DelegationOutcome::Failed {
                        reason: "empty answer".to_string(),
                    },
                ),
                work(
                    "리스크매니저",
                    DelegationOutcome::Rejected {
                        reason: "unknown".to_string(),
                    },
                ),
            ]),
            &PLAN,
        );

        let unavailable: Vec<&str> = report.unavailable().map(|s| s.role.as_str()).collect();
        assert_eq!(unavailable, ["펀더멘털 애널리스트", "리스크 매니저", "포트폴리오 메이커"]);

        let rendered = report.render();
        assert!(rendered.contains("펀더멘털 애널리스트의 작업이 실패했습니다 (empty answer)"));
        assert!(rendered.contains("리스크 매니저에게 작업이 위임되지 않았습니다"));
        assert!(rendered.ends_with("최종 리포트 본문\n"));
    }

    #[test]
    fn test_news_opinion_render() {
        let result = NewsOpinion {
            run_id: "r".to_string(),
            keyword: "삼성전자 반도체".to_string(),
            perspective: Perspective::LongTerm,
            news: "- HBM 양산\n".to_string(),
            opinion: "장기 보유 유효".to_string(),
        };
        let rendered = result.render();
        assert!(rendered.starts_with("# 삼성전자 반도체 분석 (장기 투자자 관점)"));
        assert!(rendered.find("## 뉴스 요약").unwrap() < rendered.find("## 투자 의견").unwrap());
    }
}
