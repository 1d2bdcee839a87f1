use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::dtos::requests::CreateBookingRequest;
use crate::api::extractors::auth::AuthUser;
use crate::api::handlers::event::load_event;
use crate::domain::models::booking::Booking;
use crate::error::{AppError, DomainError};
use crate::state::AppState;

async fn load_booking(state: &AppState, id: &str) -> Result<Booking, AppError> {
    state
        .booking_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".into()))
}

/// Takes a seat. When the guest already holds an invite, booking accepts
/// it: the invite is consumed and its host is recorded on the booking.
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(event_id): Path<String>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut event = load_event(&state, &event_id).await?;

    if state.booking_repo.find_by_event_and_guest(&event_id, &user.id).await?.is_some() {
        return Err(DomainError::BookingAlreadyMade.into());
    }

    let invite = state.invite_repo.find_by_event_and_guest(&event_id, &user.id).await?;

    if event.private
        && invite.is_none()
        && event.organizer_id != user.id
        && !user.is_root
    {
        return Err(AppError::Forbidden("Event is private".into()));
    }

    event.book(Utc::now())?;

    let host_id = invite.as_ref().map(|i| i.host_id.clone()).unwrap_or_else(|| user.id.clone());

    let participation_id = match &event.conversation_id {
        Some(conversation_id) => {
            match state.conversation_service.join(conversation_id, &user.id, &user.username).await {
                Ok(id) => Some(id),
                Err(e) => {
                    warn!("Failed to join conversation {}: {}", conversation_id, e);
                    None
                }
            }
        }
        None => None,
    };

    let booking = Booking::new(event_id, host_id, user.id, participation_id, payload.note);
    let created = state.booking_repo.create_with_event(&booking, &event.id).await?;

    if let Some(invite) = invite {
        state.invite_repo.delete(&invite.id).await?;
    }

    info!("Booking created: {} for event {}", created.id, created.event_id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = load_booking(&state, &id).await?;
    let event = load_event(&state, &booking.event_id).await?;

    let allowed = booking.guest_id == user.id
        || booking.host_id.as_deref() == Some(user.id.as_str())
        || event.organizer_id == user.id
        || user.is_root;
    if !allowed {
        return Err(AppError::Forbidden("Not your booking".into()));
    }

    Ok(Json(booking))
}

/// Returns the seat to the pool. Refused once the event's notice window
/// has opened.
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = load_booking(&state, &id).await?;
    let mut event = load_event(&state, &booking.event_id).await?;

    let allowed = booking.guest_id == user.id || event.organizer_id == user.id || user.is_root;
    if !allowed {
        return Err(AppError::Forbidden("Not your booking".into()));
    }

    event.unbook(Utc::now())?;
    state.booking_repo.delete_with_event(&booking.id, &event.id).await?;

    if let Some(participation_id) = &booking.participation_id {
        if let Err(e) = state.conversation_service.leave(participation_id).await {
            warn!("Failed to leave conversation: {}", e);
        }
    }

    info!("Booking canceled: {}", booking.id);
    Ok(StatusCode::NO_CONTENT)
}

/// Scanned at the door. Repeating a scan is harmless; the first timestamp
/// wins.
pub async fn check_in(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut booking = load_booking(&state, &id).await?;
    let event = load_event(&state, &booking.event_id).await?;

    if event.organizer_id != user.id && !user.is_root {
        return Err(AppError::Forbidden("Not the event organizer".into()));
    }

    if booking.checked_in() {
        return Ok(Json(booking));
    }

    booking.check_in(&event, Utc::now())?;
    Ok(Json(state.booking_repo.update(&booking).await?))
}

pub async fn list_own_bookings(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.booking_repo.list_by_guest(&user.id).await?))
}

pub async fn list_event_bookings(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = load_event(&state, &event_id).await?;
    if event.organizer_id != user.id && !user.is_root {
        return Err(AppError::Forbidden("Not the event organizer".into()));
    }

    Ok(Json(state.booking_repo.list_by_event(&event_id).await?))
}
