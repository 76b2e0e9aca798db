//! Anthropic Claude API client implementation
//!
//! Implements the LlmClient trait for Anthropic's Messages API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use super::http::{build_http_client, send_with_retry};
use super::{
    CompletionRequest, CompletionResponse, ContentBlock, LlmClient, LlmError, Message, Role, StopReason, TokenUsage,
    ToolCall,
};
use crate::config::LlmConfig;

/// Anthropic Claude API client
pub struct AnthropicClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
    max_retries: u32,
}

impl AnthropicClient {
    /// Create a new client from configuration
    ///
    /// Reads the API key from the environment variable named in config.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        debug!(model = %config.model, "AnthropicClient::from_config: called");
        let api_key = config.get_api_key()?;
        let http = build_http_client(config.timeout())?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.resolved_base_url(),
            http,
            max_tokens: config.max_tokens,
            max_retries: config.max_retries,
        })
    }

    /// Build the request body for the Anthropic API
    fn build_request_body(&self, request: &CompletionRequest) -> Value {
        debug!(%self.model, %request.max_tokens, "AnthropicClient::build_request_body: called");
        let mut body = json!({
            "model": self.model,
            "max_tokens": request.max_tokens.min(self.max_tokens),
            "system": request.system_prompt,
            "messages": convert_messages(&request.messages),
        });

        if !request.tools.is_empty() {
            body["tools"] = json!(
                request
                    .tools
                    .iter()
                    .map(|t| t.to_anthropic_schema())
                    .collect::<Vec<_>>()
            );
        }

        body
    }

    /// Parse the Anthropic API response
    fn parse_response(&self, api_response: AnthropicResponse) -> CompletionResponse {
        debug!(?api_response.stop_reason, "AnthropicClient::parse_response: called");
        let mut text_parts = Vec::new();
        let mut tool_calls = Vec::new();

        for block in api_response.content {
            match block {
                AnthropicContentBlock::Text { text } => text_parts.push(text),
                AnthropicContentBlock::ToolUse { id, name, input } => {
                    debug!(%id, %name, "AnthropicClient::parse_response: ToolUse block");
                    tool_calls.push(ToolCall { id, name, input });
                }
                AnthropicContentBlock::Other => {}
            }
        }

        CompletionResponse {
            text_parts,
            tool_calls,
            stop_reason: StopReason::from_anthropic(api_response.stop_reason.as_deref().unwrap_or("end_turn")),
            usage: api_response.usage.map(|u| TokenUsage {
                input_tokens: u.input_tokens,
                output_tokens: u.output_tokens,
            }),
        }
    }
}

/// Convert transcript turns to Anthropic messages
///
/// Tool observations travel as `tool_result` blocks inside user messages,
/// and the API requires roles to alternate, so consecutive turns with the
/// same wire role are merged into one message.
fn convert_messages(messages: &[Message]) -> Vec<Value> {
    debug!(message_count = %messages.len(), "convert_messages: called");
    let mut out: Vec<(&'static str, Vec<Value>)> = Vec::new();

    for msg in messages {
        let role = match msg.role {
            Role::Assistant => "assistant",
            Role::User | Role::Tool => "user",
        };
        let blocks: Vec<Value> = msg.blocks().iter().map(convert_content_block).collect();
        if blocks.is_empty() {
            continue;
        }

        match out.last_mut() {
            Some((last_role, content)) if *last_role == role => content.extend(blocks),
            _ => out.push((role, blocks)),
        }
    }

    out.into_iter()
        .map(|(role, content)| json!({ "role": role, "content": content }))
        .collect()
}

/// Convert a ContentBlock to Anthropic API format
fn convert_content_block(block: &ContentBlock) -> Value {
    match block {
        ContentBlock::Text { text } => json!({
            "type": "text",
            "text": text,
        }),
        ContentBlock::ToolUse { id, name, input } => json!({
            "type": "tool_use",
            "id": id,
            "name": name,
            "input": input,
        }),
        ContentBlock::ToolResult {
            tool_use_id,
            content,
            is_error,
            ..
        } => json!({
            "type": "tool_result",
            "tool_use_id": tool_use_id,
            "content": content,
            "is_error": is_error,
        }),
    }
}

#[async_trait]
impl LlmClient for AnthropicClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!(%self.model, message_count = %request.messages.len(), "AnthropicClient::complete: called");
        let url = format!("{}/v1/messages", self.base_url);
        let body = self.build_request_body(&request);

        let response = send_with_retry("anthropic", self.max_retries, || {
            self.http
                .post(&url)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", "2023-06-01")
                .header("content-type", "application/json")
                .json(&body)
        })
        .await?;

        let api_response: AnthropicResponse = response.json().await?;
        Ok(self.parse_response(api_response))
    }
}

// Anthropic API response types

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
    stop_reason: Option<String>,
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum AnthropicContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "tool_use")]
    ToolUse { id: String, name: String, input: Value },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u64,
    output_tokens: u64,
}
