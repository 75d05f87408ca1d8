//! `{{ variable }}` interpolation of agent and task text
//!
//! Undefined behavior is strict: a variable missing from the inputs fails
//! the render instead of producing an empty string.

use crate::{PromptError, Result};
use minijinja::{Environment, ErrorKind, UndefinedBehavior};
use std::sync::OnceLock;

fn env() -> &'static Environment<'static> {
    static ENV: OnceLock<Environment<'static>> = OnceLock::new();
    ENV.get_or_init(|| {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.add_filter("won", |n: i64| group_thousands(n));
        env
    })
}

/// `10000000` -> `10,000,000`; also backs the `won` filter
pub fn group_thousands<N: Into<i128>>(n: N) -> String {
    let n = n.into();
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Render `source` against the object `vars`
///
/// `name` only labels errors. Text without template markers comes back
/// unchanged, so literal braces such as `{price, pe}` are safe.
pub fn interpolate(name: &str, source: &str, vars: &serde_json::Value) -> Result<String> {
    if !source.contains("{{") && !source.contains("{%") {
        return Ok(source.to_string());
    }

    env()
        .render_str(source, minijinja::Value::from_serialize(vars))
        .map_err(|e| {
            let detail = e
                .detail()
                .map_or_else(|| e.kind().to_string(), |d| format!("{}: {d}", e.kind()));
            let name = name.to_string();
            if e.kind() == ErrorKind::SyntaxError {
                PromptError::Syntax { name, detail }
            } else {
                PromptError::Render { name, detail }
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_interpolate() {
        let out = interpolate(
            "goal",
            "{{ ticker }}의 재무 지표를 분석",
            &json!({ "ticker": "AAPL" }),
        )
        .unwrap();
        assert_eq!(out, "AAPL의 재무 지표를 분석");
    }

    #[test]
    fn test_missing_variable_is_error() {
        let err = interpolate("goal", "{{ ticker }} / {{ budget }}", &json!({ "ticker": "AAPL" }))
            .unwrap_err();
        assert!(matches!(err, PromptError::Render { ref name, .. } if name == "goal"));
    }

    #[test]
    fn test_bad_syntax() {
        let err = interpolate("task", "{{ ticker ", &json!({ "ticker": "AAPL" })).unwrap_err();
        assert!(matches!(err, PromptError::Syntax { .. }));
    }

    #[test]
    fn test_plain_text_passes_through() {
        let out = interpolate("x", "{price, pe, eps, beta}", &json!({})).unwrap();
        assert_eq!(out, "{price, pe, eps, beta}");
    }

    #[test]
    fn test_won_filter() {
        let out = interpolate("b", "{{ budget | won }}원", &json!({ "budget": 10_000_000 })).unwrap();
        assert_eq!(out, "10,000,000원");
        assert_eq!(group_thousands(-1_234), "-1,234");
        assert_eq!(group_thousands(100), "100");
        assert_eq!(group_thousands(1_000_000_000_u64), "1,000,000,000");
    }
}
