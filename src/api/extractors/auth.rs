use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use crate::error::AppError;
use crate::state::AppState;
use crate::domain::models::user::{Caller, User};
use std::sync::Arc;
use tracing::Span;

/// Resolves the `Authorization: Bearer <token>` header to a live session's
/// user. Rejects the request when the header is missing or the token is
/// unknown.
pub struct AuthUser(pub User);

/// Same resolution, but anonymous requests pass through. Used on the read
/// surfaces where visibility depends on who is asking.
pub struct MaybeAuthUser(pub Caller);

async fn resolve(parts: &Parts, state: &AppState) -> Result<Option<User>, AppError> {
    let Some(header) = parts.headers.get("Authorization") else {
        return Ok(None);
    };

    let token = header
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthorized)?;

    let session = state
        .session_repo
        .find_by_token(token)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let user = state
        .user_repo
        .find_by_id(&session.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Span::current().record("user_id", &user.id);

    Ok(Some(user))
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        match resolve(parts, &app_state).await? {
            Some(user) => Ok(AuthUser(user)),
            None => Err(AppError::Unauthorized),
        }
    }
}

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        let user = resolve(parts, &app_state).await?;
        Ok(MaybeAuthUser(Caller::from_option(user)))
    }
}
