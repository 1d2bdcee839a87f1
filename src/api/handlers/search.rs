use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use std::sync::Arc;

use crate::api::dtos::requests::{SearchEventsRequest, SearchVenuesRequest};
use crate::api::dtos::responses::SearchResponse;
use crate::api::extractors::auth::MaybeAuthUser;
use crate::domain::models::geo::{GeoArea, Interval};
use crate::domain::services::search::{self, SearchOutcome};
use crate::error::AppError;
use crate::state::AppState;

pub async fn search_venues(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(caller): MaybeAuthUser,
    Json(payload): Json<SearchVenuesRequest>,
) -> Result<impl IntoResponse, AppError> {
    let area = GeoArea {
        min_latitude: payload.min_latitude,
        max_latitude: payload.max_latitude,
        min_longitude: payload.min_longitude,
        max_longitude: payload.max_longitude,
    };

    let outcome = search::search_venues(
        state.venue_index.as_ref(),
        state.venue_repo.as_ref(),
        state.config.venues_search_limit,
        &caller,
        &area,
        &payload.categories,
    )
    .await?;

    Ok(Json(match outcome {
        SearchOutcome::TooMany => SearchResponse::too_many(),
        SearchOutcome::Results(venues) => SearchResponse::results(venues),
    }))
}

pub async fn search_events(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(caller): MaybeAuthUser,
    Json(payload): Json<SearchEventsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let area = GeoArea {
        min_latitude: payload.min_latitude,
        max_latitude: payload.max_latitude,
        min_longitude: payload.min_longitude,
        max_longitude: payload.max_longitude,
    };
    let start = Interval {
        min: payload.starts_after,
        max: payload.starts_before,
    };

    let outcome = search::search_events(
        state.event_index.as_ref(),
        state.event_repo.as_ref(),
        state.config.events_search_limit,
        &caller,
        &area,
        &payload.categories,
        start,
        Utc::now(),
    )
    .await?;

    Ok(Json(match outcome {
        SearchOutcome::TooMany => SearchResponse::too_many(),
        SearchOutcome::Results(events) => SearchResponse::results(events),
    }))
}
