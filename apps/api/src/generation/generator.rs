//! Answer Generator: turns a composed prompt into the spoken answer text.
//!
//! All model calls go through `llm_client`; this module only adapts the
//! client's errors to `GenerationError` at the trait boundary.

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::llm_client::prompts::INTERVIEW_SYSTEM;
use crate::llm_client::{LlmClient, LlmError};

/// Returned to the caller, in place of an answer, whenever generation fails.
pub const GENERATION_FALLBACK: &str = "I'm sorry, I'm having trouble putting my answer \
    together right now. Could you ask me that again in a moment?";

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("LLM endpoint unreachable: {0}")]
    Unreachable(String),

    #[error("LLM request timed out")]
    Timeout,

    #[error("LLM endpoint returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("LLM returned an empty answer")]
    EmptyAnswer,
}

impl From<LlmError> for GenerationError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Http(e) if e.is_timeout() => GenerationError::Timeout,
            LlmError::Http(e) => GenerationError::Unreachable(e.to_string()),
            LlmError::Api { status, message } => GenerationError::Status { status, message },
            LlmError::EmptyContent => GenerationError::EmptyAnswer,
        }
    }
}

#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Model identifier for logs and the health endpoint.
    fn model(&self) -> &str;
}

/// Default generator backed by the hosted model.
pub struct LlmAnswerGenerator {
    llm: LlmClient,
}

impl LlmAnswerGenerator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl AnswerGenerator for LlmAnswerGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let answer = self.llm.call_text(prompt, INTERVIEW_SYSTEM).await?;
        info!("Generated answer ({} chars)", answer.len());
        Ok(answer)
    }

    fn model(&self) -> &str {
        self.llm.model()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmConfig;

    #[test]
    fn test_api_error_maps_to_status() {
        let err: GenerationError = LlmError::Api {
            status: 401,
            message: "invalid x-api-key".to_string(),
        }
        .into();
        assert!(matches!(err, GenerationError::Status { status: 401, .. }));
    }

    #[test]
    fn test_empty_content_maps_to_empty_answer() {
        let err: GenerationError = LlmError::EmptyContent.into();
        assert!(matches!(err, GenerationError::EmptyAnswer));
    }

    #[test]
    fn test_fallback_is_a_complete_sentence() {
        assert!(GENERATION_FALLBACK.starts_with("I'm sorry"));
        assert!(GENERATION_FALLBACK.ends_with('?'));
        assert!(!GENERATION_FALLBACK.contains("  "));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_generation_error() {
        let llm = LlmClient::new(&LlmConfig {
            api_key: "k".to_string(),
            api_url: "http://127.0.0.1:9/v1/messages".to_string(),
            model: "test-model".to_string(),
            temperature: 0.7,
            max_tokens: 128,
            timeout_secs: 2,
            max_retries: 0,
        })
        .unwrap();
        let generator = LlmAnswerGenerator::new(llm);
        assert_eq!(generator.model(), "test-model");

        let err = generator.generate("prompt").await.unwrap_err();
        assert!(matches!(
            err,
            GenerationError::Unreachable(_) | GenerationError::Timeout
        ));
    }
}
