use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::dtos::requests::{AddContactRequest, CreateInviteRequest, DeclineOpenInviteRequest};
use crate::api::extractors::auth::AuthUser;
use crate::api::handlers::event::load_event;
use crate::domain::models::booking::Booking;
use crate::domain::models::event::Event;
use crate::domain::models::invite::{Contact, Invite, OpenInvite};
use crate::domain::models::user::User;
use crate::error::{AppError, DomainError};
use crate::state::AppState;

/// Who may extend invitations: the organizer and root always; for a
/// public event that can still be booked, existing invitees and guests
/// may bring others along.
async fn check_may_invite(state: &AppState, event: &Event, user: &User) -> Result<(), AppError> {
    if event.organizer_id == user.id || user.is_root {
        return Ok(());
    }

    if !event.private
        && event.is_bookable(Utc::now())
        && (state.invite_repo.find_by_event_and_guest(&event.id, &user.id).await?.is_some()
            || state.booking_repo.find_by_event_and_guest(&event.id, &user.id).await?.is_some())
    {
        return Ok(());
    }

    Err(AppError::Forbidden("Not allowed to invite to this event".into()))
}

fn render_invite_email(
    state: &AppState,
    event: &Event,
    first_name: &str,
    host_name: &str,
) -> Result<String, AppError> {
    let mut context = tera::Context::new();
    context.insert("event_name", &event.name);
    context.insert("first_name", first_name);
    context.insert("host_name", host_name);
    context.insert("start_time", &event.start.format("%Y-%m-%d %H:%M UTC").to_string());

    state.templates.render("invite.html", &context).map_err(|e| {
        warn!("Failed to render invite template: {}", e);
        AppError::Internal
    })
}

async fn notify_guest(state: &AppState, event: &Event, guest: &User, host_name: &str) {
    match render_invite_email(state, event, &guest.username, host_name) {
        Ok(html) => {
            let subject = format!("Invitation: {}", event.name);
            if let Err(e) = state.email_service.send(&guest.email, &subject, &html).await {
                warn!("Failed to email invite to {}: {}", guest.email, e);
            }
        }
        Err(e) => warn!("Invite email skipped: {}", e),
    }

    let sessions = match state.session_repo.list_by_user(&guest.id).await {
        Ok(sessions) => sessions,
        Err(e) => {
            warn!("Failed to list sessions for push: {}", e);
            return;
        }
    };
    for session in sessions {
        if let Some(device_token) = &session.device_token {
            let message = format!("{} invited you to {}", host_name, event.name);
            if let Err(e) = state.push_service.send(device_token, &message).await {
                warn!("Failed to push invite notification: {}", e);
            }
        }
    }
}

pub async fn create_invite(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(event_id): Path<String>,
    Json(payload): Json<CreateInviteRequest>,
) -> Result<impl IntoResponse, AppError> {
    let event = load_event(&state, &event_id).await?;
    check_may_invite(&state, &event, &user).await?;

    let guest = state
        .user_repo
        .find_by_id(&payload.guest_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Guest not found".into()))?;

    if state.invite_repo.find_by_event_and_guest(&event_id, &guest.id).await?.is_some() {
        return Err(DomainError::InviteAlreadyMade.into());
    }
    if state.booking_repo.find_by_event_and_guest(&event_id, &guest.id).await?.is_some() {
        return Err(DomainError::BookingAlreadyMade.into());
    }

    let invite = state
        .invite_repo
        .create(&Invite::new(event_id, user.id.clone(), guest.id.clone()))
        .await?;

    notify_guest(&state, &event, &guest, &user.username).await;

    info!("Invite created: {} for guest {}", invite.id, guest.id);
    Ok((StatusCode::CREATED, Json(invite)))
}

async fn load_invite(state: &AppState, id: &str) -> Result<Invite, AppError> {
    state
        .invite_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Invite not found".into()))
}

pub async fn get_invite(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let invite = load_invite(&state, &id).await?;
    let event = load_event(&state, &invite.event_id).await?;

    let allowed = invite.guest_id == user.id
        || invite.host_id == user.id
        || event.organizer_id == user.id
        || user.is_root;
    if !allowed {
        return Err(AppError::Forbidden("Not your invite".into()));
    }

    Ok(Json(invite))
}

/// Accepting converts the invite into a booking, crediting the inviting
/// host on the record, and consumes the invite.
pub async fn accept_invite(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let invite = load_invite(&state, &id).await?;
    if invite.guest_id != user.id {
        return Err(AppError::Forbidden("Not your invite".into()));
    }

    let mut event = load_event(&state, &invite.event_id).await?;

    if state.booking_repo.find_by_event_and_guest(&event.id, &user.id).await?.is_some() {
        return Err(DomainError::BookingAlreadyMade.into());
    }

    event.book(Utc::now())?;

    let participation_id = match &event.conversation_id {
        Some(conversation_id) => {
            match state.conversation_service.join(conversation_id, &user.id, &user.username).await {
                Ok(id) => Some(id),
                Err(e) => {
                    warn!("Failed to join conversation: {}", e);
                    None
                }
            }
        }
        None => None,
    };

    let booking = Booking::new(
        invite.event_id.clone(),
        invite.host_id.clone(),
        user.id,
        participation_id,
        String::new(),
    );
    let created = state.booking_repo.create_with_event(&booking, &event.id).await?;
    state.invite_repo.delete(&invite.id).await?;

    info!("Invite {} accepted as booking {}", invite.id, created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn decline_invite(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let invite = load_invite(&state, &id).await?;
    let event = load_event(&state, &invite.event_id).await?;

    let allowed = invite.guest_id == user.id
        || invite.host_id == user.id
        || event.organizer_id == user.id
        || user.is_root;
    if !allowed {
        return Err(AppError::Forbidden("Not your invite".into()));
    }

    state.invite_repo.delete(&invite.id).await?;
    info!("Invite declined: {}", invite.id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_own_invites(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.invite_repo.list_by_guest(&user.id).await?))
}

pub async fn list_event_invites(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = load_event(&state, &event_id).await?;
    if event.organizer_id != user.id && !user.is_root {
        return Err(AppError::Forbidden("Not the event organizer".into()));
    }

    Ok(Json(state.invite_repo.list_by_event(&event_id).await?))
}

async fn load_open_invite(state: &AppState, id: &str) -> Result<OpenInvite, AppError> {
    state
        .open_invite_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Open invite not found".into()))
}

pub async fn create_open_invite(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = load_event(&state, &event_id).await?;
    check_may_invite(&state, &event, &user).await?;

    let invite = state.open_invite_repo.create(&OpenInvite::new(event_id, user.id)).await?;
    info!("Open invite created: {}", invite.id);
    Ok((StatusCode::CREATED, Json(invite)))
}

/// The id itself is the capability: whoever holds the link may read it
/// and add themselves.
pub async fn get_open_invite(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(load_open_invite(&state, &id).await?))
}

/// Unauthenticated on purpose: contacts have no account yet. A registered
/// email is turned away and told to use a targeted invite instead.
pub async fn add_contact(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<AddContactRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut invite = load_open_invite(&state, &id).await?;
    let contact = Contact::new(payload.first_name, payload.last_name, payload.email)?;

    if state.user_repo.find_by_email(&contact.email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let event = load_event(&state, &invite.event_id).await?;
    invite.add_contact(contact.clone(), state.config.open_invite_contact_limit)?;
    let updated = state.open_invite_repo.update(&invite).await?;

    let host_name = match state.user_repo.find_by_id(&invite.host_id).await? {
        Some(host) => host.username,
        None => "Someone".to_string(),
    };
    match render_invite_email(&state, &event, &contact.first_name, &host_name) {
        Ok(html) => {
            let subject = format!("Invitation: {}", event.name);
            if let Err(e) = state.email_service.send(&contact.email, &subject, &html).await {
                warn!("Failed to email open invite to {}: {}", contact.email, e);
            }
        }
        Err(e) => warn!("Open invite email skipped: {}", e),
    }

    Ok(Json(updated))
}

/// A guest who registered with an invited email claims their seat. The
/// contact entry is consumed.
pub async fn accept_open_invite(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut invite = load_open_invite(&state, &id).await?;

    if invite.remove_contact(&user.email).is_none() {
        return Err(AppError::NotFound("No invitation for this email".into()));
    }

    let mut event = load_event(&state, &invite.event_id).await?;

    if state.booking_repo.find_by_event_and_guest(&event.id, &user.id).await?.is_some() {
        return Err(DomainError::BookingAlreadyMade.into());
    }

    event.book(Utc::now())?;

    let participation_id = match &event.conversation_id {
        Some(conversation_id) => {
            match state.conversation_service.join(conversation_id, &user.id, &user.username).await {
                Ok(pid) => Some(pid),
                Err(e) => {
                    warn!("Failed to join conversation: {}", e);
                    None
                }
            }
        }
        None => None,
    };

    let booking = Booking::new(
        invite.event_id.clone(),
        invite.host_id.clone(),
        user.id,
        participation_id,
        String::new(),
    );
    let created = state.booking_repo.create_with_event(&booking, &event.id).await?;
    state.open_invite_repo.update(&invite).await?;

    info!("Open invite {} accepted as booking {}", invite.id, created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn decline_open_invite(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<DeclineOpenInviteRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut invite = load_open_invite(&state, &id).await?;

    if invite.remove_contact(&payload.email).is_none() {
        return Err(AppError::NotFound("No invitation for this email".into()));
    }

    Ok(Json(state.open_invite_repo.update(&invite).await?))
}

pub async fn list_event_open_invites(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = load_event(&state, &event_id).await?;
    if event.organizer_id != user.id && !user.is_root {
        return Err(AppError::Forbidden("Not the event organizer".into()));
    }

    Ok(Json(state.open_invite_repo.list_by_event(&event_id).await?))
}
