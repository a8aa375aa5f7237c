//! Speech-to-text (STT) processing

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::speech::audio::{AudioClip, AudioFormat};

/// Placeholder in `STT_COMMAND` replaced by the clip's temporary file path.
pub const INPUT_PLACEHOLDER: &str = "{input}";

#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("speech recognition is not configured")]
    NotConfigured,

    #[error("audio clip is empty")]
    EmptyAudio,

    #[error("unsupported audio format")]
    UnsupportedFormat,

    #[error("no speech could be recognized")]
    Unintelligible,

    #[error("recognition request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("recognition service error: {0}")]
    Service(String),

    #[error("recognition engine failed: {0}")]
    Engine(String),

    #[error("recognition timed out")]
    Timeout,

    #[error("temporary audio file error: {0}")]
    Io(#[from] std::io::Error),
}

/// Transcribes an uploaded clip.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    async fn transcribe(&self, clip: &AudioClip) -> Result<String, RecognitionError>;

    fn backend(&self) -> &'static str;
}

/// Rejects clips no backend could handle and returns their format.
pub fn check_clip(clip: &AudioClip) -> Result<AudioFormat, RecognitionError> {
    if clip.is_empty() {
        return Err(RecognitionError::EmptyAudio);
    }
    clip.format().ok_or(RecognitionError::UnsupportedFormat)
}

fn non_blank(transcript: &str) -> Result<String, RecognitionError> {
    let transcript = transcript.trim();
    if transcript.is_empty() {
        return Err(RecognitionError::Unintelligible);
    }
    Ok(transcript.to_string())
}

/// Response from a Whisper-compatible transcription API
#[derive(serde::Deserialize)]
struct WhisperResponse {
    text: String,
}

/// Hosted Whisper-compatible transcription endpoint.
pub struct WhisperRecognizer {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
    model: String,
    language: String,
}

impl WhisperRecognizer {
    pub fn new(
        api_key: String,
        api_url: String,
        model: String,
        language: String,
        timeout: Duration,
    ) -> Result<Self, RecognitionError> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
            api_key,
            api_url,
            model,
            language,
        })
    }
}

#[async_trait]
impl SpeechRecognizer for WhisperRecognizer {
    async fn transcribe(&self, clip: &AudioClip) -> Result<String, RecognitionError> {
        let format = check_clip(clip)?;
        tracing::debug!(audio_bytes = clip.data.len(), ?format, "starting Whisper transcription");

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(clip.data.to_vec())
                    .file_name(format!("question.{}", format.extension()))
                    .mime_str(format.mime_type())?,
            )
            .text("model", self.model.clone())
            .text("language", self.language.clone());

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RecognitionError::Timeout
                } else {
                    RecognitionError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Whisper API error");
            return Err(RecognitionError::Service(format!("status {status}")));
        }

        let result: WhisperResponse = response.json().await?;
        let transcript = non_blank(&result.text)?;
        tracing::info!(chars = transcript.len(), "transcription complete");
        Ok(transcript)
    }

    fn backend(&self) -> &'static str {
        "whisper"
    }
}

/// Runs a local recognition engine (e.g. whisper.cpp) that reads the clip
/// from a file and prints the transcript on stdout.
pub struct LocalCommandRecognizer {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl LocalCommandRecognizer {
    /// `command` is split on whitespace. Every `{input}` argument is replaced
    /// by the clip path; without a placeholder the path is appended.
    pub fn new(command: &str, timeout: Duration) -> Result<Self, RecognitionError> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| RecognitionError::Engine("STT_COMMAND is empty".to_string()))?;
        Ok(Self {
            program,
            args: parts.collect(),
            timeout,
        })
    }

    fn args_for(&self, input: &str) -> Vec<String> {
        let mut args: Vec<String> = self
            .args
            .iter()
            .map(|a| a.replace(INPUT_PLACEHOLDER, input))
            .collect();
        if !self.args.iter().any(|a| a.contains(INPUT_PLACEHOLDER)) {
            args.push(input.to_string());
        }
        args
    }
}

#[async_trait]
impl SpeechRecognizer for LocalCommandRecognizer {
    async fn transcribe(&self, clip: &AudioClip) -> Result<String, RecognitionError> {
        let format = check_clip(clip)?;

        // Unique per request; removed when `file` drops.
        let file = tempfile::Builder::new()
            .prefix("question-")
            .suffix(&format!(".{}", format.extension()))
            .tempfile()?;
        tokio::fs::write(file.path(), &clip.data).await?;

        let input = file.path().to_string_lossy().into_owned();
        tracing::debug!(program = %self.program, path = %input, "running local recognizer");

        let mut command = tokio::process::Command::new(&self.program);
        command
            .args(self.args_for(&input))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| RecognitionError::Timeout)??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RecognitionError::Engine(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        non_blank(&String::from_utf8_lossy(&output.stdout))
    }

    fn backend(&self) -> &'static str {
        "local"
    }
}
