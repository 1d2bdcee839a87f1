use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Failures of the booking ledger, the event lifecycle state machine and
/// entity validation. These are surfaced to the caller as-is, never
/// silently recovered from.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid capacity")]
    InvalidCapacity,
    #[error("Insufficient capacity")]
    InsufficientCapacity,
    #[error("Event is not bookable")]
    EventNotBookable,
    #[error("Too late to perform operation")]
    TooLate,
    #[error("Event is canceled")]
    EventIsCanceled,
    #[error("Event is confirmed")]
    EventIsConfirmed,
    #[error("Event is rejected")]
    EventIsRejected,
    #[error("Event cannot be checked in")]
    EventCannotBeCheckedIn,
    #[error("Booking already made")]
    BookingAlreadyMade,
    #[error("Invite already made")]
    InviteAlreadyMade,
    #[error("Contacts in open invite limit reached")]
    ContactLimitReached,
    #[error("The news text is empty")]
    NewsTextEmpty,
    #[error("The news expiry time is in the past")]
    NewsExpiryInPast,
    #[error("Invalid email address")]
    InvalidEmail,
}

impl DomainError {
    /// Stable machine-readable code included in error responses.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::InvalidCapacity => "invalid_capacity",
            DomainError::InsufficientCapacity => "insufficient_capacity",
            DomainError::EventNotBookable => "event_not_bookable",
            DomainError::TooLate => "too_late",
            DomainError::EventIsCanceled => "event_is_canceled",
            DomainError::EventIsConfirmed => "event_is_confirmed",
            DomainError::EventIsRejected => "event_is_rejected",
            DomainError::EventCannotBeCheckedIn => "event_cannot_be_checked_in",
            DomainError::BookingAlreadyMade => "booking_already_made",
            DomainError::InviteAlreadyMade => "invite_already_made",
            DomainError::ContactLimitReached => "contact_limit_reached",
            DomainError::NewsTextEmpty => "news_text_empty",
            DomainError::NewsExpiryInPast => "news_expiry_in_past",
            DomainError::InvalidEmail => "invalid_email",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            DomainError::InvalidCapacity
            | DomainError::NewsTextEmpty
            | DomainError::NewsExpiryInPast
            | DomainError::InvalidEmail => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::CONFLICT,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Domain(e) => (e.status(), e.code(), e.to_string()),
            AppError::Database(e) => {
                if let Some(db_err) = e.as_database_error() {
                    // 2067 = SQLite unique constraint violation.
                    if db_err.code().unwrap_or_default() == "2067" {
                        return (
                            StatusCode::CONFLICT,
                            Json(json!({
                                "error": "Resource already exists (duplicate entry)",
                                "code": "duplicate",
                            })),
                        )
                            .into_response();
                    }
                }

                error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal",
                    "Internal server error".to_string(),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Unauthorized".to_string(),
            ),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation", msg.clone()),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal",
                "Internal error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": message,
            "code": code,
        }));

        (status, body).into_response()
    }
}
