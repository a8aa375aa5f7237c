//! Ask pipeline: the fixed five-step sequence behind `POST /api/v1/ask`.
//!
//! Flow: (speech-to-text) → retrieve context → compose prompt → generate →
//!       (text-to-speech).
//!
//! Every downstream failure degrades instead of aborting:
//! - recognition fails → ask the user to type the question, stop;
//! - retrieval fails or times out → continue with no facts;
//! - generation fails → fixed apology as the answer;
//! - synthesis fails → text answer without audio.

use std::time::Duration;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::ask::input::{AskInput, MAX_QUESTION_CHARS};
use crate::context::retrieve_or_empty;
use crate::generation::composer::compose_prompt;
use crate::generation::generator::GENERATION_FALLBACK;
use crate::speech::audio::AudioClip;
use crate::speech::stt::RecognitionError;
use crate::state::AppState;

/// Returned when an audio question could not be transcribed.
pub const TYPE_INSTEAD_MESSAGE: &str =
    "Sorry, I couldn't make out that recording. Could you type your question instead?";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AskResponse {
    pub answer_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    /// The recognized question, for audio input only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub retry_with_text: bool,
}

impl AskResponse {
    fn retry_with_text() -> Self {
        Self {
            answer_text: TYPE_INSTEAD_MESSAGE.to_string(),
            audio_url: None,
            transcript: None,
            retry_with_text: true,
        }
    }
}

pub async fn run_ask(state: &AppState, input: AskInput) -> AskResponse {
    // Step 1: question text
    let (question, transcript) = match input {
        AskInput::Text(text) => (text, None),
        AskInput::Audio(clip) => match transcribe(state, &clip).await {
            Ok(text) => {
                let text = cap_question(text);
                (text.clone(), Some(text))
            }
            Err(e) => {
                warn!("Speech recognition failed, asking for typed input: {e}");
                return AskResponse::retry_with_text();
            }
        },
    };
    info!("Answering question ({} chars)", question.chars().count());

    // Step 2: context
    let timeout = Duration::from_millis(state.config.context_timeout_ms);
    let facts = retrieve_or_empty(state.retriever.as_ref(), &question, timeout).await;

    // Step 3: prompt
    let prompt = compose_prompt(&state.profile, &question, &facts);

    // Step 4: answer
    let answer_text = match state.generator.generate(&prompt).await {
        Ok(answer) if !answer.trim().is_empty() => answer,
        Ok(_) => {
            error!("Answer generation returned blank text, using fallback");
            GENERATION_FALLBACK.to_string()
        }
        Err(e) => {
            error!("Answer generation failed, using fallback: {e}");
            GENERATION_FALLBACK.to_string()
        }
    };

    // Step 5: audio
    let audio_url = synthesize(state, &answer_text).await;

    AskResponse {
        answer_text,
        audio_url,
        transcript,
        retry_with_text: false,
    }
}

async fn transcribe(state: &AppState, clip: &AudioClip) -> Result<String, RecognitionError> {
    match &state.recognizer {
        Some(recognizer) => recognizer.transcribe(clip).await,
        None => Err(RecognitionError::NotConfigured),
    }
}

/// Transcripts get the same length cap as typed questions.
fn cap_question(text: String) -> String {
    match text.char_indices().nth(MAX_QUESTION_CHARS) {
        Some((cut, _)) => {
            warn!(
                "Transcript exceeds {MAX_QUESTION_CHARS} characters, truncating ({} chars)",
                text.chars().count()
            );
            text[..cut].trim_end().to_string()
        }
        None => text,
    }
}

async fn synthesize(state: &AppState, text: &str) -> Option<String> {
    let synthesizer = state.synthesizer.as_ref()?;
    match synthesizer.synthesize(text).await {
        Ok(audio) => Some(audio.to_data_url()),
        Err(e) => {
            warn!(
                "Speech synthesis via {} failed, returning text only: {e}",
                synthesizer.backend()
            );
            None
        }
    }
}
