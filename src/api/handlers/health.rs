use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

use crate::api::dtos::responses::MinAppVersionResponse;
use crate::state::AppState;

pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Clients older than this refuse to start and ask the user to upgrade.
pub async fn min_app_version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(MinAppVersionResponse {
        min_app_version: state.config.min_app_version,
    })
}
