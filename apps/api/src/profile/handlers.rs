use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileSummary {
    pub name: String,
    pub role: String,
    pub experience: String,
    pub categories: Vec<String>,
}

/// GET /api/v1/profile
/// Read-only summary of the loaded profile; prepared answer text is not exposed.
pub async fn handle_get_profile(State(state): State<AppState>) -> Json<ProfileSummary> {
    let profile = &state.profile;
    Json(ProfileSummary {
        name: profile.name.clone(),
        role: profile.role.clone(),
        experience: profile.experience.clone(),
        categories: profile.categories().map(str::to_string).collect(),
    })
}
