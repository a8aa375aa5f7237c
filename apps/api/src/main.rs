mod ask;
mod config;
mod context;
mod errors;
mod generation;
mod llm_client;
mod profile;
mod routes;
mod speech;
mod state;
#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, SttConfig, TtsConfig};
use crate::context::graph::Neo4jRetriever;
use crate::context::{ContextRetriever, NoopRetriever};
use crate::generation::generator::LlmAnswerGenerator;
use crate::llm_client::LlmClient;
use crate::profile::Profile;
use crate::routes::build_router;
use crate::speech::stt::{LocalCommandRecognizer, SpeechRecognizer, WhisperRecognizer};
use crate::speech::tts::{ElevenLabsSynthesizer, OpenAiSynthesizer, SpeechSynthesizer};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing or malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interview API v{}", env!("CARGO_PKG_VERSION"));

    let profile = Arc::new(Profile::load(config.profile_path.as_deref())?);
    info!(
        "Profile loaded: {} ({} prepared answers)",
        profile.name,
        profile.answers.len()
    );

    let llm = LlmClient::new(&config.llm)?;
    info!(
        "LLM client initialized (model: {}, retries: {})",
        llm.model(),
        config.llm.max_retries
    );
    let generator = Arc::new(LlmAnswerGenerator::new(llm));

    let retriever = build_retriever(&config)?;
    info!("Context retriever: {}", retriever.backend());

    let recognizer = build_recognizer(&config)?;
    let synthesizer = build_synthesizer(&config)?;
    info!(
        "Speech input: {}, speech output: {}",
        recognizer.as_ref().map_or("disabled", |r| r.backend()),
        synthesizer.as_ref().map_or("disabled", |s| s.backend())
    );

    let state = AppState {
        config: config.clone(),
        profile,
        generator,
        retriever,
        recognizer,
        synthesizer,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_retriever(config: &Config) -> Result<Arc<dyn ContextRetriever>> {
    let retriever: Arc<dyn ContextRetriever> = match &config.graph {
        Some(graph) => {
            // Client ceiling only; the pipeline enforces the per-request budget.
            let timeout = Duration::from_millis(config.context_timeout_ms.max(1000));
            Arc::new(Neo4jRetriever::new(graph, timeout)?)
        }
        None => Arc::new(NoopRetriever),
    };
    Ok(retriever)
}

fn build_recognizer(config: &Config) -> Result<Option<Arc<dyn SpeechRecognizer>>> {
    let recognizer: Arc<dyn SpeechRecognizer> = match &config.stt {
        None => return Ok(None),
        Some(SttConfig::Whisper {
            api_key,
            api_url,
            model,
            language,
            timeout_secs,
        }) => Arc::new(WhisperRecognizer::new(
            api_key.clone(),
            api_url.clone(),
            model.clone(),
            language.clone(),
            Duration::from_secs(*timeout_secs),
        )?),
        Some(SttConfig::Local {
            command,
            timeout_secs,
        }) => Arc::new(LocalCommandRecognizer::new(
            command,
            Duration::from_secs(*timeout_secs),
        )?),
    };
    Ok(Some(recognizer))
}

fn build_synthesizer(config: &Config) -> Result<Option<Arc<dyn SpeechSynthesizer>>> {
    let synthesizer: Arc<dyn SpeechSynthesizer> = match &config.tts {
        None => return Ok(None),
        Some(TtsConfig::OpenAi {
            api_key,
            model,
            voice,
            speed,
            timeout_secs,
        }) => Arc::new(OpenAiSynthesizer::new(
            api_key.clone(),
            model.clone(),
            voice.clone(),
            *speed,
            Duration::from_secs(*timeout_secs),
        )?),
        Some(TtsConfig::ElevenLabs {
            api_key,
            voice_id,
            model,
            timeout_secs,
        }) => Arc::new(ElevenLabsSynthesizer::new(
            api_key.clone(),
            voice_id.clone(),
            model.clone(),
            Duration::from_secs(*timeout_secs),
        )?),
    };
    Ok(Some(synthesizer))
}
