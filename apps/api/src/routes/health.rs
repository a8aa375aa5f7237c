use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
    pub capabilities: Capabilities,
}

/// Which optional collaborators are configured. Nothing here is probed.
#[derive(Debug, Serialize)]
pub struct Capabilities {
    pub model: String,
    pub graph_context: &'static str,
    pub speech_input: Option<&'static str>,
    pub speech_output: Option<&'static str>,
}

/// GET /health
/// Liveness only: makes no external calls.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        service: "interview-api",
        capabilities: Capabilities {
            model: state.generator.model().to_string(),
            graph_context: state.retriever.backend(),
            speech_input: state.recognizer.as_ref().map(|r| r.backend()),
            speech_output: state.synthesizer.as_ref().map(|s| s.backend()),
        },
    })
}
