use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::llm_client::{ANTHROPIC_API_URL, DEFAULT_MODEL};

const OPENAI_TRANSCRIPTION_URL: &str = "https://api.openai.com/v1/audio/transcriptions";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmConfig,
    /// JSON profile file. The built-in profile is used when unset.
    pub profile_path: Option<PathBuf>,
    /// Graph context is disabled when unset.
    pub graph: Option<GraphConfig>,
    pub context_timeout_ms: u64,
    pub stt: Option<SttConfig>,
    pub tts: Option<TtsConfig>,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    /// Always 0 or 1.
    pub max_retries: u32,
}

#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub http_url: String,
    pub username: String,
    pub password: String,
    pub database: String,
}

#[derive(Debug, Clone)]
pub enum SttConfig {
    Whisper {
        api_key: String,
        api_url: String,
        model: String,
        language: String,
        timeout_secs: u64,
    },
    Local {
        command: String,
        timeout_secs: u64,
    },
}

#[derive(Debug, Clone)]
pub enum TtsConfig {
    OpenAi {
        api_key: String,
        model: String,
        voice: String,
        speed: f32,
        timeout_secs: u64,
    },
    ElevenLabs {
        api_key: String,
        voice_id: String,
        model: String,
        timeout_secs: u64,
    },
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    /// Empty values are treated as unset.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| {
            var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        let temperature: f32 = parse_or(&var, "LLM_TEMPERATURE", 0.7)?;
        if !(0.0..=1.0).contains(&temperature) {
            bail!("LLM_TEMPERATURE must be between 0.0 and 1.0, got {temperature}");
        }
        let max_tokens: u32 = parse_or(&var, "LLM_MAX_TOKENS", 1024)?;
        if max_tokens == 0 {
            bail!("LLM_MAX_TOKENS must be greater than zero");
        }
        let requested_retries: u32 = parse_or(&var, "LLM_MAX_RETRIES", 0)?;

        let llm = LlmConfig {
            api_key: require("ANTHROPIC_API_KEY")?,
            api_url: var("LLM_API_URL").unwrap_or_else(|| ANTHROPIC_API_URL.to_string()),
            model: var("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature,
            max_tokens,
            timeout_secs: parse_or(&var, "LLM_TIMEOUT_SECS", 30)?,
            max_retries: requested_retries.min(1),
        };

        let graph = match var("NEO4J_HTTP_URL") {
            Some(http_url) => Some(GraphConfig {
                http_url: http_url.trim_end_matches('/').to_string(),
                username: var("NEO4J_USERNAME").unwrap_or_else(|| "neo4j".to_string()),
                password: require("NEO4J_PASSWORD")?,
                database: var("NEO4J_DATABASE").unwrap_or_else(|| "neo4j".to_string()),
            }),
            None => None,
        };

        let stt = match var("STT_PROVIDER").as_deref() {
            None => None,
            Some("whisper") => Some(SttConfig::Whisper {
                api_key: require("OPENAI_API_KEY")?,
                api_url: var("STT_API_URL")
                    .unwrap_or_else(|| OPENAI_TRANSCRIPTION_URL.to_string()),
                model: var("STT_MODEL").unwrap_or_else(|| "whisper-1".to_string()),
                language: var("STT_LANGUAGE").unwrap_or_else(|| "en".to_string()),
                timeout_secs: parse_or(&var, "STT_TIMEOUT_SECS", 20)?,
            }),
            Some("local") => Some(SttConfig::Local {
                command: require("STT_COMMAND")?,
                timeout_secs: parse_or(&var, "STT_TIMEOUT_SECS", 20)?,
            }),
            Some(other) => bail!("STT_PROVIDER must be 'whisper' or 'local', got '{other}'"),
        };

        let tts = match var("TTS_PROVIDER").as_deref() {
            None => None,
            Some("openai") => Some(TtsConfig::OpenAi {
                api_key: require("OPENAI_API_KEY")?,
                model: var("TTS_MODEL").unwrap_or_else(|| "tts-1".to_string()),
                voice: var("TTS_VOICE").unwrap_or_else(|| "alloy".to_string()),
                speed: parse_or(&var, "TTS_SPEED", 1.0)?,
                timeout_secs: parse_or(&var, "TTS_TIMEOUT_SECS", 20)?,
            }),
            Some("elevenlabs") => Some(TtsConfig::ElevenLabs {
                api_key: require("ELEVENLABS_API_KEY")?,
                voice_id: require("TTS_VOICE")?,
                model: var("TTS_MODEL").unwrap_or_else(|| "eleven_monolingual_v1".to_string()),
                timeout_secs: parse_or(&var, "TTS_TIMEOUT_SECS", 20)?,
            }),
            Some(other) => bail!("TTS_PROVIDER must be 'openai' or 'elevenlabs', got '{other}'"),
        };

        Ok(Config {
            llm,
            profile_path: var("PROFILE_PATH").map(PathBuf::from),
            graph,
            context_timeout_ms: parse_or(&var, "CONTEXT_TIMEOUT_MS", 1500)?,
            stt,
            tts,
            max_upload_bytes: parse_or(&var, "MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            port: parse_or(&var, "PORT", 8080)?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T>(var: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Minimal configuration for router tests: no optional services.
    pub fn for_tests() -> Self {
        Self::from_lookup(|key| (key == "ANTHROPIC_API_KEY").then(|| "test-key".to_string()))
            .unwrap()
    }
}
