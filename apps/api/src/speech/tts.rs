//! Text-to-speech (TTS) processing

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use bytes::Bytes;
use thiserror::Error;

/// Longest input the hosted speech APIs accept in one request.
pub const MAX_TTS_CHARS: usize = 4096;

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("text contains nothing that can be spoken")]
    UnsupportedText,

    #[error("text is {0} characters, above the synthesis limit")]
    TextTooLong(usize),

    #[error("synthesis request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("synthesis service error: {0}")]
    Service(String),
}

/// Encoded audio returned by a synthesizer.
#[derive(Debug, Clone)]
pub struct SynthesizedAudio {
    pub data: Bytes,
    pub mime_type: &'static str,
}

impl SynthesizedAudio {
    /// Inline `data:` URL, so no audio outlives the request on this server.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            base64::engine::general_purpose::STANDARD.encode(&self.data)
        )
    }
}

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, SynthesisError>;

    fn backend(&self) -> &'static str;
}

/// Drops control characters and collapses whitespace. Fails when nothing
/// speakable remains or the text exceeds `MAX_TTS_CHARS`.
pub fn prepare_text(text: &str) -> Result<String, SynthesisError> {
    let cleaned: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if !cleaned.chars().any(char::is_alphanumeric) {
        return Err(SynthesisError::UnsupportedText);
    }
    let len = cleaned.chars().count();
    if len > MAX_TTS_CHARS {
        return Err(SynthesisError::TextTooLong(len));
    }
    Ok(cleaned)
}

async fn read_audio(
    response: reqwest::Response,
    provider: &str,
) -> Result<SynthesizedAudio, SynthesisError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::error!(status = %status, body = %body, "{provider} TTS error");
        return Err(SynthesisError::Service(format!("{provider} returned {status}")));
    }

    let data = response.bytes().await?;
    if data.is_empty() {
        return Err(SynthesisError::Service(format!("{provider} returned no audio")));
    }
    tracing::debug!(audio_bytes = data.len(), "{provider} synthesis complete");
    Ok(SynthesizedAudio {
        data,
        mime_type: "audio/mpeg",
    })
}

/// `OpenAI` speech endpoint.
pub struct OpenAiSynthesizer {
    client: reqwest::Client,
    api_key: String,
    model: String,
    voice: String,
    speed: f32,
}

impl OpenAiSynthesizer {
    pub fn new(
        api_key: String,
        model: String,
        voice: String,
        speed: f32,
        timeout: Duration,
    ) -> Result<Self, SynthesisError> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
            api_key,
            model,
            voice,
            speed,
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for OpenAiSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, SynthesisError> {
        #[derive(serde::Serialize)]
        struct TtsRequest<'a> {
            model: &'a str,
            input: &'a str,
            voice: &'a str,
            speed: f32,
            response_format: &'a str,
        }

        let input = prepare_text(text)?;
        let request = TtsRequest {
            model: &self.model,
            input: &input,
            voice: &self.voice,
            speed: self.speed,
            response_format: "mp3",
        };

        let response = self
            .client
            .post("https://api.openai.com/v1/audio/speech")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        read_audio(response, "OpenAI").await
    }

    fn backend(&self) -> &'static str {
        "openai"
    }
}

/// ElevenLabs text-to-speech endpoint.
pub struct ElevenLabsSynthesizer {
    client: reqwest::Client,
    api_key: String,
    voice_id: String,
    model: String,
}

impl ElevenLabsSynthesizer {
    pub fn new(
        api_key: String,
        voice_id: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, SynthesisError> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
            api_key,
            voice_id,
            model,
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, SynthesisError> {
        #[derive(serde::Serialize)]
        struct ElevenLabsRequest<'a> {
            text: &'a str,
            model_id: &'a str,
        }

        let input = prepare_text(text)?;
        let url = format!(
            "https://api.elevenlabs.io/v1/text-to-speech/{}",
            self.voice_id
        );

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .header("accept", "audio/mpeg")
            .json(&ElevenLabsRequest {
                text: &input,
                model_id: &self.model,
            })
            .send()
            .await?;

        read_audio(response, "ElevenLabs").await
    }

    fn backend(&self) -> &'static str {
        "elevenlabs"
    }
}
