//! Prompts shared by every crew agent
//!
//! The system prompt carries the agent's identity (role, backstory, goal).
//! The user turn carries the task, its expected output and any context
//! produced by earlier tasks.

use crate::{Language, PromptBuilder};

struct Labels {
    task: &'static str,
    expected: &'static str,
    context: &'static str,
    goal: &'static str,
    coworkers: &'static str,
    plan: &'static str,
    finish: &'static str,
}

const KO: Labels = Labels {
    task: "현재 작업",
    expected: "기대 결과",
    context: "참고 맥락",
    goal: "당신의 목표",
    coworkers: "협업 가능한 동료",
    plan: "위임 순서",
    finish: "최종 답변만 작성하세요. 작업 설명을 반복하지 마세요.",
};

const EN: Labels = Labels {
    task: "Current Task",
    expected: "Expected Output",
    context: "Context",
    goal: "Your personal goal is",
    coworkers: "Coworkers",
    plan: "Delegation order",
    finish: "Respond with your final answer only. Do not repeat the task.",
};

fn labels(lang: &Language) -> &'static Labels {
    match lang {
        Language::English => &EN,
        _ => &KO,
    }
}

/// Identity prompt for an agent
pub fn agent_system_prompt(role: &str, goal: &str, backstory: &str, lang: &Language) -> String {
    let l = labels(lang);
    let intro = match lang {
        Language::English => format!("You are {role}."),
        _ => format!("당신은 {role}입니다."),
    };

    PromptBuilder::new()
        .text(intro)
        .when(!backstory.trim().is_empty(), format!("\n{}", backstory.trim()))
        .text(format!("\n\n{}: {}", l.goal, goal.trim()))
        .build()
}

/// One prior output handed to a task as context
#[derive(Debug, Clone, Copy)]
pub struct ContextEntry<'a> {
    /// Role that produced the output
    pub role: &'a str,
    /// The output text
    pub text: &'a str,
}

/// User-turn prompt for a task
pub fn task_prompt(
    description: &str,
    expected_output: &str,
    context: &[ContextEntry<'_>],
    lang: &Language,
) -> String {
    let l = labels(lang);
    let mut builder = PromptBuilder::new()
        .section(l.task)
        .text(description.trim())
        .newline()
        .section(l.expected)
        .text(expected_output.trim())
        .newline();

    if !context.is_empty() {
        builder = builder.section(l.context);
        for entry in context {
            builder = builder.text(format!("### {}\n{}\n", entry.role, entry.text.trim()));
        }
    }

    builder.newline().text(l.finish).build_trimmed()
}

/// Extra system-prompt section telling a manager who it can delegate to
///
/// `coworkers` pairs each role with its goal. `plan` is the required order,
/// empty when any order is allowed.
pub fn manager_addendum(coworkers: &[(&str, &str)], plan: &[&str], lang: &Language) -> String {
    let l = labels(lang);
    let mut builder = PromptBuilder::new()
        .section(l.coworkers)
        .bullets(coworkers.iter().map(|(role, goal)| format!("{role}: {goal}")));

    if !plan.is_empty() {
        builder = builder.section(l.plan).numbered_list(plan.iter().copied());
    }

    let rule = match lang {
        Language::English => {
            "Use the coworker name exactly as listed. Any other spelling is rejected."
        }
        _ => "동료 이름은 위 목록과 정확히 같은 문자열로 지정하세요. 다른 표기는 거부됩니다.",
    };
    builder.newline().text(rule).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_korean() {
        let prompt = agent_system_prompt(
            "증시 뉴스 분석가",
            "삼성전자 반도체 관련 뉴스 수집",
            "금융 뉴스를 빠르게 요약하는 전문가",
            &Language::Korean,
        );
        assert!(prompt.starts_with("당신은 증시 뉴스 분석가입니다."));
        assert!(prompt.contains("당신의 목표: 삼성전자 반도체 관련 뉴스 수집"));
    }

    #[test]
    fn test_system_prompt_without_backstory() {
        let prompt = agent_system_prompt("Analyst", "Find news", "  ", &Language::English);
        assert_eq!(prompt, "You are Analyst.\n\nYour personal goal is: Find news");
    }

    #[test]
    fn test_task_prompt_with_context() {
        let context = [ContextEntry {
            role: "증시 뉴스 분석가",
            text: "1. 반도체 수출 증가",
        }];
        let prompt = task_prompt("투자 의견 작성", "3문장 의견", &context, &Language::Korean);

        let task = prompt.find("## 현재 작업").unwrap();
        let expected = prompt.find("## 기대 결과").unwrap();
        let ctx = prompt.find("## 참고 맥락").unwrap();
        assert!(task < expected && expected < ctx);
        assert!(prompt.contains("### 증시 뉴스 분석가\n1. 반도체 수출 증가"));
    }

    #[test]
    fn test_task_prompt_without_context() {
        let prompt = task_prompt("Collect news", "3-5 items", &[], &Language::English);
        assert!(!prompt.contains("## Context"));
        assert!(prompt.ends_with("Do not repeat the task."));
    }

    #[test]
    fn test_manager_addendum_lists_plan() {
        let text = manager_addendum(
            &[("News 연구원", "뉴스 수집"), ("리스크 매니저", "위험 평가")],
            &["News 연구원", "리스크 매니저"],
            &Language::Korean,
        );
        assert!(text.contains("- News 연구원: 뉴스 수집"));
        assert!(text.contains("1. News 연구원\n2. 리스크 매니저"));
    }
}
