use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::DomainError;

/// A short announcement bound to a venue. Dead news disappears from the
/// feed once `expires_at` passes; construction requires a non-empty text
/// and a future expiry.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct News {
    pub id: String,
    pub venue_id: String,
    pub text: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl News {
    pub fn new(
        venue_id: String,
        text: String,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        check(&text, expires_at, now)?;

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            venue_id,
            text,
            expires_at,
            created_at: now,
        })
    }
}

fn check(text: &str, expires_at: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), DomainError> {
    if text.is_empty() {
        return Err(DomainError::NewsTextEmpty);
    }

    if now >= expires_at {
        return Err(DomainError::NewsExpiryInPast);
    }

    Ok(())
}
