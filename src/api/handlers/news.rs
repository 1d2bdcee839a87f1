use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::CreateNewsRequest;
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::news::News;
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_news(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(venue_id): Path<String>,
    Json(payload): Json<CreateNewsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let venue = state
        .venue_repo
        .find_by_id(&venue_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Venue not found".into()))?;

    if venue.owner_id != user.id && !user.is_root {
        return Err(AppError::Forbidden("Not the venue owner".into()));
    }

    let news = News::new(venue_id, payload.text, payload.expires_at, Utc::now())?;
    let created = state.news_repo.create(&news).await?;
    info!("News posted: {} for venue {}", created.id, created.venue_id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn delete_news(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let news = state
        .news_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("News not found".into()))?;

    let venue = state
        .venue_repo
        .find_by_id(&news.venue_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Venue not found".into()))?;

    if venue.owner_id != user.id && !user.is_root {
        return Err(AppError::Forbidden("Not the venue owner".into()));
    }

    state.news_repo.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Live announcements, soonest to expire first. Dead news never appears.
pub async fn news_feed(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.news_repo.list_expiring_after(Utc::now()).await?))
}
