/// LLM Client: the single point of entry for all hosted-model calls.
///
/// ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
/// All LLM interactions MUST go through this module.
///
/// Model, sampling temperature, token budget and the retry allowance come from
/// configuration. At most one immediate retry is made, and only for transient
/// failures.
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::LlmConfig;

pub mod prompts;

pub const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// Used when `LLM_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl LlmError {
    /// Connection failures, timeouts, rate limits and server errors may succeed
    /// on an immediate second attempt. Anything else will not.
    pub fn is_transient(&self) -> bool {
        match self {
            LlmError::Http(e) => e.is_connect() || e.is_timeout(),
            LlmError::Api { status, .. } => *status == 429 || *status >= 500,
            LlmError::EmptyContent => false,
        }
    }
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Wraps the Anthropic Messages API with the configured sampling parameters.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    max_retries: u32,
}

impl LlmClient {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()?,
            api_key: config.api_key.clone(),
            api_url: config.api_url.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            max_retries: config.max_retries.min(1),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Makes a call to the model, returning the full response object.
    /// A transient failure is retried immediately when a retry is allowed.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<LlmResponse, LlmError> {
        let request_body = AnthropicRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut attempt = 0;
        loop {
            match self.send_once(&request_body).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    warn!("LLM call failed ({e}), retrying immediately");
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Calls the model and returns the trimmed text of the first text block.
    pub async fn call_text(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        let response = self.call(prompt, system).await?;
        let text = response.text().map(str::trim).unwrap_or_default();
        if text.is_empty() {
            return Err(LlmError::EmptyContent);
        }
        Ok(text.to_string())
    }

    async fn send_once(&self, request_body: &AnthropicRequest<'_>) -> Result<LlmResponse, LlmError> {
        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Try to parse error message
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            warn!("LLM API returned {}: {}", status, message);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let llm_response: LlmResponse = response.json().await?;

        debug!(
            "LLM call succeeded: input_tokens={}, output_tokens={}",
            llm_response.usage.input_tokens, llm_response.usage.output_tokens
        );

        Ok(llm_response)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    use super::*;

    fn response(json: &str) -> LlmResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_text_picks_first_text_block() {
        let r = response(
            r#"{
                "content": [
                    {"type": "tool_use", "text": null},
                    {"type": "text", "text": "My #1 superpower is rapid learning."}
                ],
                "usage": {"input_tokens": 120, "output_tokens": 12}
            }"#,
        );
        assert_eq!(r.text(), Some("My #1 superpower is rapid learning."));
    }

    #[test]
    fn test_text_none_without_text_block() {
        let r = response(r#"{"content": [], "usage": {"input_tokens": 1, "output_tokens": 0}}"#);
        assert!(r.text().is_none());
    }

    #[test]
    fn test_server_errors_and_rate_limits_are_transient() {
        let rate_limited = LlmError::Api {
            status: 429,
            message: "slow down".to_string(),
        };
        let overloaded = LlmError::Api {
            status: 529,
            message: "overloaded".to_string(),
        };
        assert!(rate_limited.is_transient());
        assert!(overloaded.is_transient());
    }

    #[test]
    fn test_client_errors_are_not_transient() {
        let bad_request = LlmError::Api {
            status: 400,
            message: "max_tokens too large".to_string(),
        };
        assert!(!bad_request.is_transient());
        assert!(!LlmError::EmptyContent.is_transient());
    }

    fn config(api_url: &str, max_retries: u32) -> LlmConfig {
        LlmConfig {
            api_key: "k".to_string(),
            api_url: api_url.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 256,
            timeout_secs: 5,
            max_retries,
        }
    }

    /// Local endpoint answering every request with `status`. Returns its URL
    /// and the number of requests served so far.
    async fn canned_endpoint(status: u16) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                read_request(&mut socket).await;
                counter.fetch_add(1, Ordering::SeqCst);
                let body = r#"{"type":"error","error":{"type":"api_error","message":"canned"}}"#;
                let response = format!(
                    "HTTP/1.1 {status} Canned\r\ncontent-type: application/json\r\n\
                     content-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{addr}/v1/messages"), hits)
    }

    async fn read_request(socket: &mut TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap_or(0);
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
                let body_len = headers
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + body_len {
                    return;
                }
            }
        }
    }

    async fn requests_made(status: u16, max_retries: u32) -> usize {
        let (url, hits) = canned_endpoint(status).await;
        let client = LlmClient::new(&config(&url, max_retries)).unwrap();
        let err = client.call_text("hello", "system").await.unwrap_err();
        assert!(matches!(err, LlmError::Api { status: s, ref message } if s == status && message == "canned"));
        hits.load(Ordering::SeqCst)
    }

    #[test]
    fn test_client_clamps_retries() {
        let client = LlmClient::new(&config(ANTHROPIC_API_URL, 3)).unwrap();
        assert_eq!(client.max_retries, 1);
        assert_eq!(client.model(), DEFAULT_MODEL);
    }

    #[tokio::test]
    async fn test_no_retry_by_default() {
        assert_eq!(requests_made(503, 0).await, 1);
    }

    #[tokio::test]
    async fn test_server_error_retried_once() {
        assert_eq!(requests_made(503, 1).await, 2);
        assert_eq!(requests_made(429, 1).await, 2);
    }

    #[tokio::test]
    async fn test_retry_allowance_is_capped_at_one() {
        assert_eq!(requests_made(503, 5).await, 2);
    }

    #[tokio::test]
    async fn test_client_error_never_retried() {
        assert_eq!(requests_made(400, 1).await, 1);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_http_error() {
        // Port 9 on localhost: nothing listens there in test environments.
        let mut config = config("http://127.0.0.1:9/v1/messages", 1);
        config.timeout_secs = 2;
        let client = LlmClient::new(&config).unwrap();
        let err = client.call_text("hello", "system").await.unwrap_err();
        assert!(matches!(err, LlmError::Http(_)));
    }
}
