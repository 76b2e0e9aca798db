//! LoopEngine - drives the model/tool round trips of one run

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::llm::{CompletionRequest, LlmClient, LlmError, Message, StopReason, TokenUsage};
use crate::tools::ToolExecutor;

use super::{LoopConfig, Transcript};

/// Sent after a reply that hit the token limit instead of finishing
const CONTINUE_AFTER_TRUNCATION: &str = "Continue from where you left off. Your previous response was truncated.";

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The model replied with text and no tool calls
    Answered { answer: String },
    /// The iteration budget ran out first
    Exhausted { iterations: u32 },
}

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub usage: TokenUsage,
    pub transcript: Transcript,
    pub model_calls: u32,
}

impl RunReport {
    /// Final answer, if the run produced one
    pub fn answer(&self) -> Option<&str> {
        match &self.outcome {
            RunOutcome::Answered { answer } => Some(answer),
            RunOutcome::Exhausted { .. } => None,
        }
    }
}

/// Errors that abort a run
#[derive(Debug, Error)]
pub enum LoopError {
    #[error("Model call failed: {0}")]
    Model(#[from] LlmError),
}

/// Loop execution engine
pub struct LoopEngine {
    config: LoopConfig,
    llm: Arc<dyn LlmClient>,
    executor: ToolExecutor,
}

impl LoopEngine {
    /// Create a new loop engine
    pub fn new(llm: Arc<dyn LlmClient>, executor: ToolExecutor, config: LoopConfig) -> Self {
        debug!(?config.max_iterations, "LoopEngine::new: called");
        Self { config, llm, executor }
    }

    /// Run the loop until the model answers or the budget is spent
    ///
    /// Tool failures are fed back to the model as results and never end the
    /// run. A failed model call does.
    pub async fn run(&self, task: &str) -> Result<RunReport, LoopError> {
        info!(max_iterations = %self.config.max_iterations, "Starting run");
        let tools = self.executor.definitions();
        let mut transcript = Transcript::new(task);
        let mut usage = TokenUsage::default();
        let mut model_calls = 0;

        for iteration in 1..=self.config.max_iterations {
            debug!(%iteration, "LoopEngine::run: iteration");

            let request = CompletionRequest {
                system_prompt: self.config.system_prompt.clone(),
                messages: transcript.turns().to_vec(),
                tools: tools.clone(),
                max_tokens: self.config.max_tokens,
            };

            let response = match self.llm.complete(request).await {
                Ok(r) => r,
                Err(e) => {
                    warn!(%iteration, error = %e, "Model call failed, aborting run");
                    return Err(LoopError::Model(e));
                }
            };
            model_calls += 1;

            if let Some(call_usage) = response.usage {
                usage += call_usage;
            } else {
                debug!("LoopEngine::run: no usage reported");
            }

            transcript.push(response.to_message());

            for call in &response.tool_calls {
                let result = self.executor.dispatch(call).await;
                transcript.push(Message::tool_result(
                    &call.id,
                    &call.name,
                    result.content(),
                    result.is_error(),
                ));
            }

            if response.tool_calls.is_empty() && response.stop_reason == StopReason::MaxTokens {
                warn!(%iteration, "Reply truncated at max tokens, asking the model to continue");
                transcript.push(Message::user(CONTINUE_AFTER_TRUNCATION));
                continue;
            }

            if response.tool_calls.is_empty()
                && let Some(answer) = response.final_text()
            {
                info!(%iteration, "Run answered");
                return Ok(RunReport {
                    outcome: RunOutcome::Answered { answer },
                    usage,
                    transcript,
                    model_calls,
                });
            }
        }

        warn!(max_iterations = %self.config.max_iterations, "Run exhausted its iteration budget");
        Ok(RunReport {
            outcome: RunOutcome::Exhausted {
                iterations: self.config.max_iterations,
            },
            usage,
            transcript,
            model_calls,
        })
    }
}
