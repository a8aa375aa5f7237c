//! Axum route handlers for the Ask API.

use axum::{extract::State, Json};
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::ask::input::AskInput;
use crate::ask::pipeline::{run_ask, AskResponse};
use crate::state::AppState;

/// POST /api/v1/ask
///
/// Body: `{"text": "..."}` as JSON, or multipart with an `audio` file part.
/// Malformed input is rejected with 400 by the `AskInput` extractor. Past
/// validation the response is always 200: service failures degrade into the
/// answer instead of surfacing as errors.
pub async fn handle_ask(State(state): State<AppState>, input: AskInput) -> Json<AskResponse> {
    let request_id = Uuid::new_v4();
    let response = run_ask(&state, input)
        .instrument(info_span!("ask", %request_id))
        .await;
    Json(response)
}
