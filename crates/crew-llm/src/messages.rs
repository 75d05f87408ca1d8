//! Conversation turns
//!
//! An assistant turn may ask for tools; the next user turn must answer every
//! call with a result block carrying the same id.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },

    /// The model asks for `name` to be run with `input`
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },

    /// Answer to the `ToolUse` with the same id; errors are reported, not thrown
    ToolResult {
        tool_use_id: String,
        content: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        is_error: Option<bool>,
    },
}

impl ContentBlock {
    pub fn tool_result(tool_use_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::ToolResult {
            tool_use_id: tool_use_id.into(),
            content: content.into(),
            is_error: None,
        }
    }

    /// Result block the model reads as a failure
    pub fn tool_error(tool_use_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self::ToolResult {
            tool_use_id: tool_use_id.into(),
            content: error.into(),
            is_error: Some(true),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<MessageContent>,
}

/// Borrowed view of a tool use request
#[derive(Debug, Clone, Copy)]
pub struct ToolCall<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub input: &'a serde_json::Value,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Some(MessageContent::Text(text.into())),
        }
    }

    pub fn assistant_blocks(blocks: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::Assistant,
            content: Some(MessageContent::Blocks(blocks)),
        }
    }

    /// User turn answering the previous turn's tool calls
    pub fn tool_results(results: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::User,
            content: Some(MessageContent::Blocks(results)),
        }
    }

    /// Text blocks joined with newlines; `None` when there is no text
    pub fn text(&self) -> Option<String> {
        match &self.content {
            Some(MessageContent::Text(s)) => Some(s.clone()),
            Some(MessageContent::Blocks(blocks)) => {
                let parts: Vec<&str> = blocks
                    .iter()
                    .filter_map(|b| match b {
                        ContentBlock::Text { text } if !text.is_empty() => Some(text.as_str()),
                        _ => None,
                    })
                    .collect();
                if parts.is_empty() {
                    None
                } else {
                    Some(parts.join("\n"))
                }
            }
            None => None,
        }
    }

    /// Tool calls in block order
    pub fn tool_calls(&self) -> Vec<ToolCall<'_>> {
        match &self.content {
            Some(MessageContent::Blocks(blocks)) => blocks
                .iter()
                .filter_map(|b| match b {
                    ContentBlock::ToolUse { id, name, input } => Some(ToolCall { id, name, input }),
                    _ => None,
                })
                .collect(),
            _ => vec![],
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_message() {
        let msg = Message::user("삼성전자 반도체");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.text().as_deref(), Some("삼성전자 반도체"));
    }

    #[test]
    fn test_text_joins_blocks() {
        let msg = Message::assistant_blocks(vec![
            ContentBlock::Text {
                text: "first".to_string(),
            },
            ContentBlock::ToolUse {
                id: "call_1".to_string(),
                name: "finance_data".to_string(),
                input: json!({"ticker": "AAPL"}),
            },
            ContentBlock::Text {
                text: "second".to_string(),
            },
        ]);
        assert_eq!(msg.text().as_deref(), Some("first\nsecond"));
    }

    #[test]
    fn test_tool_calls() {
        let msg = Message::assistant_blocks(vec![ContentBlock::ToolUse {
            id: "call_1".to_string(),
            name: "finance_data".to_string(),
            input: json!({"ticker": "AAPL"}),
        }]);

        let calls = msg.tool_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "finance_data");
        assert_eq!(calls[0].input["ticker"], "AAPL");
        assert!(msg.text().is_none());
    }

    #[test]
    fn test_tool_results_are_user_turns() {
        let msg = Message::tool_results(vec![
            ContentBlock::tool_result("call_1", "ok"),
            ContentBlock::tool_error("call_2", "boom"),
        ]);
        assert_eq!(msg.role, Role::User);
        assert!(!msg.has_tool_calls());
    }

    #[test]
    fn test_message_serialization() {
        let msg = Message::tool_results(vec![ContentBlock::tool_error("call_9", "timeout")]);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["content"][0]["type"], "tool_result");
        assert_eq!(json["content"][0]["is_error"], true);

        let back: Message = serde_json::from_value(json).unwrap();
        assert_eq!(back, msg);
    }
}
