//! Tool declarations sent to the model

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What the model sees of a tool
///
/// `name` is what the model echoes back in a tool call, so it must match a
/// tool in the calling agent's registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema of the call arguments
    pub input_schema: Value,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// JSON Schema fragments for tool inputs
pub mod schema {
    use serde_json::{Value, json};

    /// Object schema with properties and required keys
    ///
    /// # Example
    ///
    /// ```
    /// use crew_llm::tools::schema;
    /// use serde_json::json;
    ///
    /// let schema = schema::object(
    ///     json!({ "query": schema::string("Search query") }),
    ///     &["query"],
    /// );
    /// assert_eq!(schema["required"][0], "query");
    /// ```
    pub fn object(properties: Value, required: &[&str]) -> Value {
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    pub fn string(description: &str) -> Value {
        json!({
            "type": "string",
            "description": description,
        })
    }

    /// String limited to `values`; the model sees the allowed set
    pub fn string_enum<S: AsRef<str>>(description: &str, values: &[S]) -> Value {
        let values: Vec<&str> = values.iter().map(AsRef::as_ref).collect();
        json!({
            "type": "string",
            "description": description,
            "enum": values,
        })
    }
}
