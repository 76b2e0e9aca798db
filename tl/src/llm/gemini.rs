//! Google Gemini API client implementation
//!
//! Implements the LlmClient trait for the generateContent endpoint with
//! function calling.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;
use uuid::Uuid;

use super::http::{build_http_client, send_with_retry};
use super::{
    CompletionRequest, CompletionResponse, ContentBlock, LlmClient, LlmError, Message, Role, StopReason, TokenUsage,
    ToolCall,
};
use crate::config::LlmConfig;

/// Gemini API client
pub struct GeminiClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
    max_retries: u32,
}

impl GeminiClient {
    /// Create a new client from configuration
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        debug!(model = %config.model, "GeminiClient::from_config: called");
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

    fn build_request_body(&self, request: &CompletionRequest) -> Value {
        debug!(%self.model, %request.max_tokens, "GeminiClient::build_request_body: called");
        let mut body = json!({
            "systemInstruction": { "parts": [{ "text": request.system_prompt }] },
            "contents": convert_messages(&request.messages),
            "generationConfig": { "maxOutputTokens": request.max_tokens.min(self.max_tokens) },
        });

        if !request.tools.is_empty() {
            let declarations: Vec<Value> = request.tools.iter().map(|t| t.to_gemini_declaration()).collect();
            body["tools"] = json!([{ "functionDeclarations": declarations }]);
        }

        body
    }

    fn parse_response(&self, api_response: GeminiResponse) -> Result<CompletionResponse, LlmError> {
        debug!("GeminiClient::parse_response: called");
        let usage = api_response.usage_metadata.map(|u| TokenUsage {
            input_tokens: u.prompt_token_count,
            output_tokens: u.candidates_token_count,
        });

        let Some(candidate) = api_response.candidates.into_iter().next() else {
            let reason = api_response
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates".to_string());
            return Err(LlmError::InvalidResponse(format!("Gemini returned no candidates: {}", reason)));
        };

        let mut text_parts = Vec::new();
        let mut tool_calls = Vec::new();

        for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
            if part.thought == Some(true) {
                debug!("GeminiClient::parse_response: skipping thought part");
                continue;
            }
            if let Some(text) = part.text {
                text_parts.push(text);
            }
            if let Some(call) = part.function_call {
                let id = format!("call_{}", Uuid::now_v7());
                debug!(%id, name = %call.name, "GeminiClient::parse_response: functionCall part");
                tool_calls.push(ToolCall {
                    id,
                    name: call.name,
                    input: call.args.unwrap_or_else(|| json!({})),
                });
            }
        }

        let stop_reason = StopReason::from_gemini(candidate.finish_reason.as_deref().unwrap_or("STOP"), !tool_calls.is_empty());

        Ok(CompletionResponse {
            text_parts,
            tool_calls,
            stop_reason,
            usage,
        })
    }
}

/// Convert transcript turns to Gemini contents
///
/// Assistant turns use the `model` role. Tool observations are sent back as
/// `functionResponse` parts in a user turn, and consecutive turns with the
/// same wire role are merged.
fn convert_messages(messages: &[Message]) -> Vec<Value> {
    debug!(message_count = %messages.len(), "convert_messages: called");
    let mut out: Vec<(&'static str, Vec<Value>)> = Vec::new();

    for msg in messages {
        let role = match msg.role {
            Role::Assistant => "model",
            Role::User | Role::Tool => "user",
        };
        let parts: Vec<Value> = msg.blocks().iter().map(convert_content_block).collect();
        if parts.is_empty() {
            continue;
        }

        match out.last_mut() {
            Some((last_role, content)) if *last_role == role => content.extend(parts),
            _ => out.push((role, parts)),
        }
    }

    out.into_iter()
        .map(|(role, parts)| json!({ "role": role, "parts": parts }))
        .collect()
}

fn convert_content_block(block: &ContentBlock) -> Value {
    match block {
        ContentBlock::Text { text } => json!({ "text": text }),
        ContentBlock::ToolUse { name, input, .. } => json!({
            "functionCall": { "name": name, "args": input },
        }),
        ContentBlock::ToolResult {
            name,
            content,
            is_error,
            ..
        } => {
            let response = if *is_error {
                json!({ "error": content })
            } else {
                json!({ "result": content })
            };
            json!({
                "functionResponse": { "name": name, "response": response },
            })
        }
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!(%self.model, message_count = %request.messages.len(), "GeminiClient::complete: called");
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model);
        let body = self.build_request_body(&request);

        let response = send_with_retry("gemini", self.max_retries, || {
            self.http
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .header("content-type", "application/json")
                .json(&body)
        })
        .await?;

        let api_response: GeminiResponse = response.json().await?;
        self.parse_response(api_response)
    }
}

// Gemini API response types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsage>,
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    text: Option<String>,
    thought: Option<bool>,
    function_call: Option<GeminiFunctionCall>,
}

#[derive(Debug, Deserialize)]
struct GeminiFunctionCall {
    name: String,
    args: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u64,
    #[serde(default)]
    candidates_token_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}
