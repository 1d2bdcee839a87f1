use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::dtos::requests::{
    ChangeVenueRequest, CreateEventRequest, UpdateEventRequest, UpdateImagesRequest,
};
use crate::api::extractors::auth::{AuthUser, MaybeAuthUser};
use crate::domain::models::capacity::Capacity;
use crate::domain::models::event::{Event, NewEventParams};
use crate::domain::models::user::{Caller, User};
use crate::domain::models::venue::Venue;
use crate::error::AppError;
use crate::state::AppState;

fn capacity_or_inherit(requested: Option<u32>) -> Capacity {
    match requested {
        Some(n) => Capacity::Finite(n),
        None => Capacity::Uninitialized,
    }
}

pub(super) async fn load_event(state: &AppState, id: &str) -> Result<Event, AppError> {
    state
        .event_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".into()))
}

async fn load_venue(state: &AppState, id: &str) -> Result<Venue, AppError> {
    state
        .venue_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Venue not found".into()))
}

fn check_organizer(event: &Event, user: &User) -> Result<(), AppError> {
    if event.organizer_id != user.id && !user.is_root {
        return Err(AppError::Forbidden("Not the event organizer".into()));
    }
    Ok(())
}

fn check_venue_owner(venue: &Venue, user: &User) -> Result<(), AppError> {
    if venue.owner_id != user.id && !user.is_root {
        return Err(AppError::Forbidden("Not the venue owner".into()));
    }
    Ok(())
}

/// An event is visible to everyone when public, and otherwise to its
/// organizer, root, and anyone already holding an invite or a seat.
pub(super) async fn check_event_visible(
    state: &AppState,
    event: &Event,
    caller: &Caller,
) -> Result<(), AppError> {
    if !event.private || caller.is_root() || caller.user_id() == Some(&event.organizer_id) {
        return Ok(());
    }

    if let Some(user_id) = caller.user_id() {
        if state.invite_repo.find_by_event_and_guest(&event.id, user_id).await?.is_some()
            || state.booking_repo.find_by_event_and_guest(&event.id, user_id).await?.is_some()
        {
            return Ok(());
        }
    }

    Err(AppError::Forbidden("Event is private".into()))
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let venue = load_venue(&state, &payload.venue_id).await?;
    if venue.private && venue.owner_id != user.id && !user.is_root {
        return Err(AppError::Forbidden("Venue is private".into()));
    }

    let conversation_id = state.conversation_service.build(&payload.name, &user.id).await?;

    let mut event = Event::new(
        NewEventParams {
            organizer_id: user.id,
            name: payload.name,
            private: payload.private,
            category: payload.category,
            category_description: payload.category_description,
            capacity: capacity_or_inherit(payload.capacity),
            start: payload.start_time,
            duration_secs: payload.duration_secs,
            notice_secs: payload.notice_secs,
            conversation_id: Some(conversation_id),
        },
        &venue,
    )?;
    event.images = payload.images;

    let created = state.event_repo.create(&event).await?;
    info!("Event created: {} at venue {}", created.id, created.venue_id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(caller): MaybeAuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = load_event(&state, &id).await?;
    check_event_visible(&state, &event, &caller).await?;
    Ok(Json(event))
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut event = load_event(&state, &id).await?;
    check_organizer(&event, &user)?;
    let venue = load_venue(&state, &event.venue_id).await?;

    let renamed = event.name != payload.name;
    event.update(
        payload.name,
        payload.category,
        payload.category_description,
        capacity_or_inherit(payload.capacity),
        payload.start_time,
        payload.duration_secs,
        payload.notice_secs,
        venue.capacity,
    )?;

    let updated = state.event_repo.update(&event).await?;

    if renamed {
        if let Some(conversation_id) = &updated.conversation_id {
            state.conversation_service.set_name(conversation_id, &updated.name).await?;
        }
    }

    Ok(Json(updated))
}

pub async fn update_event_images(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateImagesRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut event = load_event(&state, &id).await?;
    check_organizer(&event, &user)?;

    event.images = payload.images;
    Ok(Json(state.event_repo.update(&event).await?))
}

pub async fn change_venue(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<ChangeVenueRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut event = load_event(&state, &id).await?;
    check_organizer(&event, &user)?;

    let venue = load_venue(&state, &payload.venue_id).await?;
    if venue.private && venue.owner_id != user.id && !user.is_root {
        return Err(AppError::Forbidden("Venue is private".into()));
    }

    event.set_venue(&venue, Utc::now())?;
    let updated = state.event_repo.update(&event).await?;
    info!("Event {} moved to venue {}", updated.id, updated.venue_id);
    Ok(Json(updated))
}

pub async fn request_confirmation(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut event = load_event(&state, &id).await?;
    check_organizer(&event, &user)?;

    event.request_confirmation(Utc::now())?;
    Ok(Json(state.event_repo.update(&event).await?))
}

pub async fn confirm_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut event = load_event(&state, &id).await?;
    let venue = load_venue(&state, &event.venue_id).await?;
    check_venue_owner(&venue, &user)?;

    event.confirm(Utc::now())?;
    Ok(Json(state.event_repo.update(&event).await?))
}

pub async fn reject_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut event = load_event(&state, &id).await?;
    let venue = load_venue(&state, &event.venue_id).await?;
    check_venue_owner(&venue, &user)?;

    event.reject(Utc::now())?;
    Ok(Json(state.event_repo.update(&event).await?))
}

pub async fn cancel_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut event = load_event(&state, &id).await?;

    if event.organizer_id != user.id && !user.is_root {
        let venue = load_venue(&state, &event.venue_id).await?;
        check_venue_owner(&venue, &user)?;
    }

    let transitioned = event.cancel(Utc::now());
    let updated = state.event_repo.update(&event).await?;

    if transitioned {
        if let Some(conversation_id) = &updated.conversation_id {
            if let Err(e) = state.conversation_service.unpublish(conversation_id).await {
                warn!("Failed to unpublish conversation {}: {}", conversation_id, e);
            }
        }
        info!("Event canceled: {}", updated.id);
    }

    Ok(Json(updated))
}

/// Guests flagging abusive or phantom events. Only someone holding a seat
/// may report.
pub async fn report_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut event = load_event(&state, &id).await?;

    if state.booking_repo.find_by_event_and_guest(&event.id, &user.id).await?.is_none() {
        return Err(AppError::Forbidden("Only guests may report an event".into()));
    }

    event.report();
    Ok(Json(state.event_repo.update(&event).await?))
}

pub async fn list_own_events(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.event_repo.list_by_organizer(&user.id).await?))
}

/// Upcoming public events at a venue, for the venue page.
pub async fn list_venue_events(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(caller): MaybeAuthUser,
    Path(venue_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let venue = load_venue(&state, &venue_id).await?;
    if venue.private && !caller.is_root() && caller.user_id() != Some(&venue.owner_id) {
        return Err(AppError::Forbidden("Venue is private".into()));
    }

    Ok(Json(state.event_repo.list_public_by_venue(&venue_id, Utc::now()).await?))
}
