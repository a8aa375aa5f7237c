use std::sync::Arc;

use crate::config::Config;
use crate::context::ContextRetriever;
use crate::generation::generator::AnswerGenerator;
use crate::profile::Profile;
use crate::speech::stt::SpeechRecognizer;
use crate::speech::tts::SpeechSynthesizer;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything in it is read-only after startup; cloning only bumps `Arc` counts.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Loaded once at startup, never mutated.
    pub profile: Arc<Profile>,
    pub generator: Arc<dyn AnswerGenerator>,
    /// `NoopRetriever` when no graph store is configured.
    pub retriever: Arc<dyn ContextRetriever>,
    /// Audio questions degrade to a typed-input prompt when unset.
    pub recognizer: Option<Arc<dyn SpeechRecognizer>>,
    /// Answers are text-only when unset.
    pub synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
}
