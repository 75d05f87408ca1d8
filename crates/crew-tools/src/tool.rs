use async_trait::async_trait;
use crew_core::Result;
use serde_json::Value;

/// A capability an agent can call by name
///
/// One JSON object in, one JSON value out. Caching and rate limiting are the
/// implementation's business.
#[async_trait]
pub trait Tool: Send + Sync {
    /// `params` is expected to satisfy [`Tool::input_schema`]
    async fn execute(&self, params: Value) -> Result<Value>;

    /// Name the model uses to call the tool
    fn name(&self) -> &str;

    /// Shown to the model to decide when the tool applies
    fn description(&self) -> &str;

    /// JSON Schema of `params`
    fn input_schema(&self) -> Value;
}

/// What the model sees for a tool output
///
/// Strings pass through; anything else becomes compact JSON.
pub fn render_output(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_output() {
        assert_eq!(render_output(&json!("headline one")), "headline one");
        let object = render_output(&json!({"price": null, "beta": 1.2}));
        assert!(object.contains(r#""price":null"#));
        assert!(!object.contains('\n'));
    }
}
