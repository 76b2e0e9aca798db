//! LLM request/response types
//!
//! Provider-agnostic shapes for one model call. Each provider module maps
//! these onto its own wire format.

use serde::{Deserialize, Serialize};
use std::ops::AddAssign;
use tracing::debug;

/// A completion request - everything needed for one LLM call
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System instruction
    pub system_prompt: String,

    /// The full transcript so far
    pub messages: Vec<Message>,

    /// Available tools
    pub tools: Vec<ToolDefinition>,

    /// Max tokens for response (from config)
    pub max_tokens: u32,
}

/// A message in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
}

impl Message {
    /// Create a user message with text content
    pub fn user(text: impl Into<String>) -> Self {
        debug!("Message::user: called");
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    /// Create an assistant message with text content
    pub fn assistant(text: impl Into<String>) -> Self {
        debug!("Message::assistant: called");
        Self {
            role: Role::Assistant,
            content: MessageContent::Text(text.into()),
        }
    }

    /// Create an assistant message with multiple content blocks
    pub fn assistant_blocks(blocks: Vec<ContentBlock>) -> Self {
        debug!(block_count = %blocks.len(), "Message::assistant_blocks: called");
        Self {
            role: Role::Assistant,
            content: MessageContent::Blocks(blocks),
        }
    }

    /// Create a tool-result message answering one tool call
    pub fn tool_result(
        tool_use_id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
        is_error: bool,
    ) -> Self {
        debug!(%is_error, "Message::tool_result: called");
        Self {
            role: Role::Tool,
            content: MessageContent::Blocks(vec![ContentBlock::tool_result(tool_use_id, name, content, is_error)]),
        }
    }

    /// Content as a list of blocks, wrapping plain text in a single block
    pub fn blocks(&self) -> Vec<ContentBlock> {
        match &self.content {
            MessageContent::Text(text) => vec![ContentBlock::text(text)],
            MessageContent::Blocks(blocks) => blocks.clone(),
        }
    }
}

/// Message role
///
/// `Tool` marks injected tool observations so they are never confused with
/// the model's own output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Tool,
}

/// Message content - either plain text or structured blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

/// A content block in a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },

    #[serde(rename = "tool_use")]
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },

    #[serde(rename = "tool_result")]
    ToolResult {
        tool_use_id: String,
        name: String,
        content: String,
        #[serde(default)]
        is_error: bool,
    },
}

impl ContentBlock {
    /// Create a text content block
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    /// Create a tool result block
    pub fn tool_result(
        tool_use_id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
        is_error: bool,
    ) -> Self {
        ContentBlock::ToolResult {
            tool_use_id: tool_use_id.into(),
            name: name.into(),
            content: content.into(),
            is_error,
        }
    }
}

/// Response from a completion request
#[derive(Debug, Clone, Default)]
pub struct CompletionResponse {
    /// Text parts in the order the model produced them
    pub text_parts: Vec<String>,

    /// Tool calls requested by the model, in order
    pub tool_calls: Vec<ToolCall>,

    /// Why the model stopped
    pub stop_reason: StopReason,

    /// Token usage, when the provider reported it
    pub usage: Option<TokenUsage>,
}

impl CompletionResponse {
    /// Plain text reply with no tool calls
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text_parts: vec![text.into()],
            ..Default::default()
        }
    }

    /// Reply that only requests tool calls
    pub fn tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls,
            stop_reason: StopReason::ToolUse,
            ..Default::default()
        }
    }

    /// Text parts concatenated, or None if every part is empty
    pub fn final_text(&self) -> Option<String> {
        if self.text_parts.iter().all(|part| part.is_empty()) {
            return None;
        }
        Some(self.text_parts.concat())
    }

    /// The reply as an assistant transcript turn
    pub fn to_message(&self) -> Message {
        let mut blocks: Vec<ContentBlock> = self
            .text_parts
            .iter()
            .filter(|part| !part.is_empty())
            .map(ContentBlock::text)
            .collect();

        for call in &self.tool_calls {
            blocks.push(ContentBlock::ToolUse {
                id: call.id.clone(),
                name: call.name.clone(),
                input: call.input.clone(),
            });
        }

        Message::assistant_blocks(blocks)
    }
}

/// A tool call requested by the model
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub input: serde_json::Value,
}

/// Why the model stopped generating
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StopReason {
    #[default]
    EndTurn,
    ToolUse,
    MaxTokens,
}

impl StopReason {
    /// Parse from Anthropic API stop_reason string
    pub fn from_anthropic(s: &str) -> Self {
        debug!(%s, "StopReason::from_anthropic: called");
        match s {
            "tool_use" => StopReason::ToolUse,
            "max_tokens" => StopReason::MaxTokens,
            _ => StopReason::EndTurn,
        }
    }

    /// Parse from Gemini finishReason; tool calls are detected from the parts
    pub fn from_gemini(s: &str, has_tool_calls: bool) -> Self {
        debug!(%s, %has_tool_calls, "StopReason::from_gemini: called");
        match s {
            "MAX_TOKENS" => StopReason::MaxTokens,
            _ if has_tool_calls => StopReason::ToolUse,
            _ => StopReason::EndTurn,
        }
    }
}

/// Token usage for observability
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl AddAssign for TokenUsage {
    fn add_assign(&mut self, other: Self) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
    }
}

/// Tool definition for the LLM
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

impl ToolDefinition {
    /// Create a new tool definition
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: serde_json::Value) -> Self {
        let name = name.into();
        let description = description.into();
        debug!(%name, "ToolDefinition::new: called");
        Self {
            name,
            description,
            input_schema,
        }
    }

    /// Convert to Anthropic API schema format
    pub fn to_anthropic_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "input_schema": self.input_schema,
        })
    }

    /// Convert to a Gemini function declaration
    pub fn to_gemini_declaration(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "parameters": self.input_schema,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_user() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role, Role::User);
        assert!(matches!(msg.content, MessageContent::Text(ref s) if s == "Hello"));
    }

    #[test]
    fn test_message_tool_result_role() {
        let msg = Message::tool_result("call_1", "read_file", "contents", false);
        assert_eq!(msg.role, Role::Tool);
        assert_eq!(
            msg.blocks(),
            vec![ContentBlock::tool_result("call_1", "read_file", "contents", false)]
        );
    }

    #[test]
    fn test_final_text_concatenates_parts() {
        let response = CompletionResponse {
            text_parts: vec!["The answer ".to_string(), "".to_string(), "is 8.".to_string()],
            ..Default::default()
        };
        assert_eq!(response.final_text(), Some("The answer is 8.".to_string()));
    }

    #[test]
    fn test_final_text_none_when_empty() {
        assert_eq!(CompletionResponse::default().final_text(), None);

        let blank = CompletionResponse {
            text_parts: vec![String::new()],
            ..Default::default()
        };
        assert_eq!(blank.final_text(), None);
    }

    #[test]
    fn test_to_message_orders_text_before_tool_calls() {
        let response = CompletionResponse {
            text_parts: vec!["Looking around".to_string()],
            tool_calls: vec![ToolCall {
                id: "call_1".to_string(),
                name: "list_files".to_string(),
                input: serde_json::json!({}),
            }],
            stop_reason: StopReason::ToolUse,
            usage: None,
        };

        let msg = response.to_message();
        assert_eq!(msg.role, Role::Assistant);
        let blocks = msg.blocks();
        assert!(matches!(blocks[0], ContentBlock::Text { ref text } if text == "Looking around"));
        assert!(matches!(blocks[1], ContentBlock::ToolUse { ref name, .. } if name == "list_files"));
    }

    #[test]
    fn test_token_usage_accumulates() {
        let mut total = TokenUsage::default();
        total += TokenUsage {
            input_tokens: 100,
            output_tokens: 20,
        };
        total += TokenUsage {
            input_tokens: 150,
            output_tokens: 5,
        };
        assert_eq!(total.input_tokens, 250);
        assert_eq!(total.output_tokens, 25);
    }

    #[test]
    fn test_stop_reason_from_anthropic() {
        assert_eq!(StopReason::from_anthropic("end_turn"), StopReason::EndTurn);
        assert_eq!(StopReason::from_anthropic("tool_use"), StopReason::ToolUse);
        assert_eq!(StopReason::from_anthropic("max_tokens"), StopReason::MaxTokens);
        assert_eq!(StopReason::from_anthropic("stop_sequence"), StopReason::EndTurn);
        assert_eq!(StopReason::from_anthropic("unknown"), StopReason::EndTurn);
    }

    #[test]
    fn test_stop_reason_from_gemini() {
        assert_eq!(StopReason::from_gemini("STOP", false), StopReason::EndTurn);
        assert_eq!(StopReason::from_gemini("STOP", true), StopReason::ToolUse);
        assert_eq!(StopReason::from_gemini("MAX_TOKENS", true), StopReason::MaxTokens);
    }

    #[test]
    fn test_tool_definition_schemas() {
        let tool = ToolDefinition::new(
            "read_file",
            "Read a file",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "file_path": { "type": "string" }
                },
                "required": ["file_path"]
            }),
        );

        let anthropic = tool.to_anthropic_schema();
        assert_eq!(anthropic["name"], "read_file");
        assert!(anthropic["input_schema"].is_object());

        let gemini = tool.to_gemini_declaration();
        assert_eq!(gemini["description"], "Read a file");
        assert_eq!(gemini["parameters"]["required"][0], "file_path");
    }
}
