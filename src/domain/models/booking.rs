use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::models::event::{Event, EventState};
use crate::error::DomainError;

/// A reserved seat. The id doubles as the check-in credential (the client
/// renders it as a 2D barcode scanned at the door).
///
/// The host is whoever granted the reservation; it may differ from both
/// the guest and the event organizer, and it is a weak reference: the
/// booking outlives the host's account.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub event_id: String,
    pub host_id: Option<String>,
    pub guest_id: String,
    /// Weak: the conversation participation created when the guest joined.
    pub participation_id: Option<String>,
    pub note: String,
    /// None until checked in.
    pub checked_in_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(
        event_id: String,
        host_id: String,
        guest_id: String,
        participation_id: Option<String>,
        note: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_id,
            host_id: Some(host_id),
            guest_id,
            participation_id,
            note,
            checked_in_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn checked_in(&self) -> bool {
        self.checked_in_at.is_some()
    }

    /// Only confirmed events take check-ins. Does not guard against a
    /// repeated check-in; the caller decides whether to skip.
    pub fn check_in(&mut self, event: &Event, now: DateTime<Utc>) -> Result<(), DomainError> {
        if event.state != EventState::Confirmed {
            return Err(DomainError::EventCannotBeCheckedIn);
        }

        self.checked_in_at = Some(now);
        Ok(())
    }
}
