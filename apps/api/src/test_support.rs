//! In-memory collaborators and an `AppState` builder for unit and router tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::config::Config;
use crate::context::{ContextFact, ContextRetrievalError, ContextRetriever, NoopRetriever};
use crate::generation::generator::{AnswerGenerator, GenerationError};
use crate::profile::Profile;
use crate::speech::audio::AudioClip;
use crate::speech::stt::{RecognitionError, SpeechRecognizer};
use crate::speech::tts::{SpeechSynthesizer, SynthesisError, SynthesizedAudio};
use crate::state::AppState;

pub struct StaticGenerator(pub &'static str);

#[async_trait]
impl AnswerGenerator for StaticGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Ok(self.0.to_string())
    }

    fn model(&self) -> &str {
        "static-model"
    }
}

pub struct FailingGenerator;

#[async_trait]
impl AnswerGenerator for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Status {
            status: 503,
            message: "upstream overloaded".to_string(),
        })
    }

    fn model(&self) -> &str {
        "failing-model"
    }
}

/// Answers with a fixed string and keeps every prompt it was given.
pub struct RecordingGenerator {
    answer: &'static str,
    prompts: Mutex<Vec<String>>,
}

impl RecordingGenerator {
    pub fn new(answer: &'static str) -> Self {
        Self {
            answer,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnswerGenerator for RecordingGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.answer.to_string())
    }

    fn model(&self) -> &str {
        "recording-model"
    }
}

pub struct StaticRetriever(pub Vec<ContextFact>);

#[async_trait]
impl ContextRetriever for StaticRetriever {
    async fn retrieve(&self, _question: &str) -> Result<Vec<ContextFact>, ContextRetrievalError> {
        Ok(self.0.clone())
    }

    fn backend(&self) -> &'static str {
        "static"
    }
}

pub struct FailingRetriever;

#[async_trait]
impl ContextRetriever for FailingRetriever {
    async fn retrieve(&self, _question: &str) -> Result<Vec<ContextFact>, ContextRetrievalError> {
        Err(ContextRetrievalError::Status {
            status: 503,
            message: "graph store unavailable".to_string(),
        })
    }

    fn backend(&self) -> &'static str {
        "failing"
    }
}

/// Sleeps for the given duration, then returns one fact.
pub struct SlowRetriever(pub Duration);

#[async_trait]
impl ContextRetriever for SlowRetriever {
    async fn retrieve(&self, _question: &str) -> Result<Vec<ContextFact>, ContextRetrievalError> {
        tokio::time::sleep(self.0).await;
        Ok(vec![ContextFact::new("late", "too late to matter")])
    }

    fn backend(&self) -> &'static str {
        "slow"
    }
}

pub struct StaticRecognizer(pub &'static str);

#[async_trait]
impl SpeechRecognizer for StaticRecognizer {
    async fn transcribe(&self, _clip: &AudioClip) -> Result<String, RecognitionError> {
        Ok(self.0.to_string())
    }

    fn backend(&self) -> &'static str {
        "static"
    }
}

pub struct FailingRecognizer;

#[async_trait]
impl SpeechRecognizer for FailingRecognizer {
    async fn transcribe(&self, _clip: &AudioClip) -> Result<String, RecognitionError> {
        Err(RecognitionError::Unintelligible)
    }

    fn backend(&self) -> &'static str {
        "failing"
    }
}

pub struct StaticSynthesizer;

#[async_trait]
impl SpeechSynthesizer for StaticSynthesizer {
    async fn synthesize(&self, _text: &str) -> Result<SynthesizedAudio, SynthesisError> {
        Ok(SynthesizedAudio {
            data: Bytes::from_static(b"ID3"),
            mime_type: "audio/mpeg",
        })
    }

    fn backend(&self) -> &'static str {
        "static"
    }
}

pub struct FailingSynthesizer;

#[async_trait]
impl SpeechSynthesizer for FailingSynthesizer {
    async fn synthesize(&self, _text: &str) -> Result<SynthesizedAudio, SynthesisError> {
        Err(SynthesisError::Service("voice unavailable".to_string()))
    }

    fn backend(&self) -> &'static str {
        "failing"
    }
}

/// Builds an `AppState` with the built-in profile, no graph store and no
/// speech services unless overridden.
pub struct TestState {
    config: Config,
    generator: Arc<dyn AnswerGenerator>,
    retriever: Arc<dyn ContextRetriever>,
    recognizer: Option<Arc<dyn SpeechRecognizer>>,
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
}

impl TestState {
    pub fn new() -> Self {
        Self {
            config: Config::for_tests(),
            generator: Arc::new(StaticGenerator("test answer")),
            retriever: Arc::new(NoopRetriever),
            recognizer: None,
            synthesizer: None,
        }
    }

    pub fn generator(self, generator: impl AnswerGenerator + 'static) -> Self {
        self.generator_arc(Arc::new(generator))
    }

    pub fn generator_arc(mut self, generator: Arc<dyn AnswerGenerator>) -> Self {
        self.generator = generator;
        self
    }

    pub fn retriever(mut self, retriever: impl ContextRetriever + 'static) -> Self {
        self.retriever = Arc::new(retriever);
        self
    }

    pub fn recognizer(mut self, recognizer: impl SpeechRecognizer + 'static) -> Self {
        self.recognizer = Some(Arc::new(recognizer));
        self
    }

    pub fn synthesizer(mut self, synthesizer: impl SpeechSynthesizer + 'static) -> Self {
        self.synthesizer = Some(Arc::new(synthesizer));
        self
    }

    pub fn max_upload_bytes(mut self, limit: usize) -> Self {
        self.config.max_upload_bytes = limit;
        self
    }

    pub fn build(self) -> AppState {
        AppState {
            config: self.config,
            profile: Arc::new(Profile::builtin().unwrap()),
            generator: self.generator,
            retriever: self.retriever,
            recognizer: self.recognizer,
            synthesizer: self.synthesizer,
        }
    }
}
