use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{
    CreateVenueRequest, TransferVenueRequest, UpdateImagesRequest, UpdateVenueRequest,
};
use crate::api::extractors::auth::{AuthUser, MaybeAuthUser};
use crate::domain::models::capacity::Capacity;
use crate::domain::models::geo::Position;
use crate::domain::models::user::{Caller, User};
use crate::domain::models::venue::{NewVenueParams, Venue, VenueClaim};
use crate::error::AppError;
use crate::state::AppState;

fn capacity_or_infinite(requested: Option<u32>) -> Capacity {
    match requested {
        Some(n) => Capacity::Finite(n),
        None => Capacity::Infinite,
    }
}

fn check_owner(venue: &Venue, user: &User) -> Result<(), AppError> {
    if venue.owner_id != user.id && !user.is_root {
        return Err(AppError::Forbidden("Not the venue owner".into()));
    }
    Ok(())
}

fn check_visible(venue: &Venue, caller: &Caller) -> Result<(), AppError> {
    if !venue.private || caller.is_root() || caller.user_id() == Some(&venue.owner_id) {
        return Ok(());
    }
    Err(AppError::Forbidden("Venue is private".into()))
}

async fn load_venue(state: &AppState, id: &str) -> Result<Venue, AppError> {
    state
        .venue_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Venue not found".into()))
}

pub async fn create_venue(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateVenueRequest>,
) -> Result<impl IntoResponse, AppError> {
    // Ordinary accounts manage their own places; the public directory is
    // curated by root.
    if !payload.private && !user.is_root {
        return Err(AppError::Forbidden("Only root may create public venues".into()));
    }

    let venue = Venue::new(NewVenueParams {
        owner_id: user.id,
        name: payload.name,
        private: payload.private,
        category: payload.category,
        category_description: payload.category_description,
        position: Position {
            latitude: payload.latitude,
            longitude: payload.longitude,
        },
        address: payload.address,
        capacity: capacity_or_infinite(payload.capacity),
        description: payload.description,
        confirmation_required: payload.confirmation_required,
        rating: payload.rating,
        images: payload.images,
    });

    let created = state.venue_repo.create(&venue).await?;
    info!("Venue created: {}", created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_venue(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(caller): MaybeAuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let venue = load_venue(&state, &id).await?;
    check_visible(&venue, &caller)?;
    Ok(Json(venue))
}

pub async fn update_venue(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateVenueRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut venue = load_venue(&state, &id).await?;
    check_owner(&venue, &user)?;

    venue.update(
        payload.name,
        payload.category,
        payload.category_description,
        payload.address,
        capacity_or_infinite(payload.capacity),
        payload.description,
        payload.confirmation_required,
        payload.rating,
    );

    Ok(Json(state.venue_repo.update(&venue).await?))
}

pub async fn update_venue_images(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateImagesRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut venue = load_venue(&state, &id).await?;
    check_owner(&venue, &user)?;

    venue.images = payload.images;
    Ok(Json(state.venue_repo.update(&venue).await?))
}

pub async fn transfer_venue(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<TransferVenueRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut venue = load_venue(&state, &id).await?;
    check_owner(&venue, &user)?;

    if state.user_repo.find_by_id(&payload.new_owner_id).await?.is_none() {
        return Err(AppError::NotFound("New owner not found".into()));
    }

    venue.transfer(payload.new_owner_id);
    let updated = state.venue_repo.update(&venue).await?;
    info!("Venue {} transferred to {}", updated.id, updated.owner_id);
    Ok(Json(updated))
}

pub async fn delete_venue(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let venue = load_venue(&state, &id).await?;
    check_owner(&venue, &user)?;

    state.venue_repo.delete(&id).await?;
    info!("Venue deleted: {}", id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_own_venues(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.venue_repo.list_by_owner(&user.id).await?))
}

pub async fn create_claim(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(venue_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let venue = load_venue(&state, &venue_id).await?;
    if venue.owner_id == user.id {
        return Err(AppError::Conflict("Already the venue owner".into()));
    }

    let claim = state.claim_repo.create(&VenueClaim::new(venue_id, user.id)).await?;
    info!("Venue claim filed: {}", claim.id);
    Ok((StatusCode::CREATED, Json(claim)))
}

pub async fn list_claims(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    if !user.is_root {
        return Err(AppError::Forbidden("Root only".into()));
    }
    Ok(Json(state.claim_repo.list().await?))
}

pub async fn accept_claim(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !user.is_root {
        return Err(AppError::Forbidden("Root only".into()));
    }

    let claim = state
        .claim_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Claim not found".into()))?;

    let mut venue = load_venue(&state, &claim.venue_id).await?;
    venue.transfer(claim.user_id.clone());
    let updated = state.venue_repo.update(&venue).await?;
    state.claim_repo.delete(&id).await?;

    info!("Claim {} accepted, venue {} now owned by {}", id, updated.id, updated.owner_id);
    Ok(Json(updated))
}

pub async fn reject_claim(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !user.is_root {
        return Err(AppError::Forbidden("Root only".into()));
    }

    state.claim_repo.delete(&id).await?;
    info!("Claim rejected: {}", id);
    Ok(StatusCode::NO_CONTENT)
}
