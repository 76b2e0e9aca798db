//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during LLM operations
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("API key not found. Set the {env_var} environment variable.")]
    MissingApiKey { env_var: String },

    #[error("Unknown LLM provider: '{0}'. Supported: gemini, anthropic")]
    UnknownProvider(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LlmError {
    /// Check if this error is worth retrying at the transport level
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::RateLimited { .. } => true,
            LlmError::ApiError { status, .. } => matches!(*status, 408 | 500 | 502 | 503 | 504 | 529),
            LlmError::Network(_) => true,
            LlmError::InvalidResponse(_)
            | LlmError::MissingApiKey { .. }
            | LlmError::UnknownProvider(_)
            | LlmError::Json(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_retryable() {
        assert!(
            LlmError::ApiError {
                status: 502,
                message: "Bad gateway".to_string()
            }
            .is_retryable()
        );

        assert!(
            !LlmError::ApiError {
                status: 400,
                message: "Bad request".to_string()
            }
            .is_retryable()
        );

        assert!(!LlmError::InvalidResponse("Bad JSON".to_string()).is_retryable());
        assert!(
            !LlmError::MissingApiKey {
                env_var: "GEMINI_API_KEY".to_string()
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_rate_limit_and_gateway_errors_are_retryable() {
        let rate_limited = LlmError::RateLimited {
            retry_after: Duration::from_secs(60),
        };
        assert!(rate_limited.is_retryable());

        for status in [408, 500, 503, 529] {
            let err = LlmError::ApiError {
                status,
                message: String::new(),
            };
            assert!(err.is_retryable(), "{status}");
        }

        for status in [404, 501, 505] {
            let err = LlmError::ApiError {
                status,
                message: String::new(),
            };
            assert!(!err.is_retryable(), "{status}");
        }
    }

    #[test]
    fn test_missing_api_key_message() {
        let err = LlmError::MissingApiKey {
            env_var: "GEMINI_API_KEY".to_string(),
        };
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }
}
