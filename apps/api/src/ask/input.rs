//! Request input for the ask endpoint: exactly one of typed text or audio.

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::speech::audio::AudioClip;

/// Longest typed question accepted.
pub const MAX_QUESTION_CHARS: usize = 2000;

/// A validated question, either typed or spoken.
#[derive(Debug)]
pub enum AskInput {
    Text(String),
    Audio(AudioClip),
}

#[derive(Debug, Deserialize)]
pub struct AskTextBody {
    #[serde(default, alias = "question")]
    pub text: Option<String>,
}

#[async_trait]
impl<S> FromRequest<S> for AskInput
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state).await?;
            read_multipart(multipart).await
        } else if content_type.starts_with("application/json") {
            let Json(body) = Json::<AskTextBody>::from_request(req, state).await?;
            from_parts(body.text, None)
        } else {
            Err(AppError::Validation(
                "Content-Type must be application/json or multipart/form-data".to_string(),
            ))
        }
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<AskInput, AppError> {
    let mut text = None;
    let mut audio = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "text" | "question" => text = Some(field.text().await?),
            "audio" => {
                let content_type = field.content_type().map(str::to_string);
                let file_name = field.file_name().map(str::to_string);
                let data = field.bytes().await?;
                audio = Some(AudioClip {
                    data,
                    content_type,
                    file_name,
                });
            }
            _ => {}
        }
    }

    from_parts(text, audio)
}

/// Blank text and zero-length audio count as absent.
fn from_parts(text: Option<String>, audio: Option<AudioClip>) -> Result<AskInput, AppError> {
    let text = text
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    let audio = audio.filter(|a| !a.is_empty());

    match (text, audio) {
        (Some(text), None) => {
            if text.chars().count() > MAX_QUESTION_CHARS {
                return Err(AppError::Validation(format!(
                    "`text` must be at most {MAX_QUESTION_CHARS} characters"
                )));
            }
            Ok(AskInput::Text(text))
        }
        (None, Some(audio)) => Ok(AskInput::Audio(audio)),
        (Some(_), Some(_)) => Err(AppError::Validation(
            "Provide either a `text` field or an `audio` file, not both".to_string(),
        )),
        (None, None) => Err(AppError::Validation(
            "Request must include a non-empty `text` field or an `audio` file".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    fn clip(data: &'static [u8]) -> AudioClip {
        AudioClip {
            data: Bytes::from_static(data),
            content_type: Some("audio/wav".to_string()),
            file_name: None,
        }
    }

    #[test]
    fn test_text_is_trimmed() {
        let input = from_parts(Some("  What's your #1 superpower?  ".to_string()), None).unwrap();
        assert!(matches!(input, AskInput::Text(t) if t == "What's your #1 superpower?"));
    }

    #[test]
    fn test_audio_alone_is_accepted() {
        let input = from_parts(None, Some(clip(b"RIFF"))).unwrap();
        assert!(matches!(input, AskInput::Audio(_)));
    }

    #[test]
    fn test_blank_text_with_audio_counts_as_audio() {
        let input = from_parts(Some("   ".to_string()), Some(clip(b"RIFF"))).unwrap();
        assert!(matches!(input, AskInput::Audio(_)));
    }

    #[test]
    fn test_neither_is_rejected() {
        let err = from_parts(Some(" ".to_string()), Some(clip(b""))).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("non-empty")));
    }

    #[test]
    fn test_both_is_rejected() {
        let err = from_parts(Some("Hi".to_string()), Some(clip(b"RIFF"))).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("not both")));
    }

    #[test]
    fn test_overlong_text_is_rejected() {
        let err = from_parts(Some("x".repeat(MAX_QUESTION_CHARS + 1)), None).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_question_alias_in_json() {
        let body: AskTextBody = serde_json::from_str(r#"{"question": "Why Rust?"}"#).unwrap();
        assert_eq!(body.text.as_deref(), Some("Why Rust?"));

        let body: AskTextBody = serde_json::from_str("{}").unwrap();
        assert!(body.text.is_none());
    }
}
