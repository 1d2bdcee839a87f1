use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use uuid::Uuid;

use crate::domain::models::capacity::Capacity;
use crate::domain::models::venue::Venue;
use crate::error::DomainError;

/// Lifecycle of an event at a venue.
///
/// `Unconfirmed → ConfirmationRequested → Confirmed`, with `Rejected` and
/// `Canceled` absorbing. The venue owner may force-confirm a rejected
/// event, but a rejected event can never re-enter the request queue; the
/// asymmetry is intentional workflow design.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventState {
    Unconfirmed,
    ConfirmationRequested,
    Confirmed,
    Rejected,
    Canceled,
}

impl EventState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventState::Unconfirmed => "UNCONFIRMED",
            EventState::ConfirmationRequested => "CONFIRMATION_REQUESTED",
            EventState::Confirmed => "CONFIRMED",
            EventState::Rejected => "REJECTED",
            EventState::Canceled => "CANCELED",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "UNCONFIRMED" => Some(EventState::Unconfirmed),
            "CONFIRMATION_REQUESTED" => Some(EventState::ConfirmationRequested),
            "CONFIRMED" => Some(EventState::Confirmed),
            "REJECTED" => Some(EventState::Rejected),
            "CANCELED" => Some(EventState::Canceled),
            _ => None,
        }
    }

    /// Rejected and canceled events take no bookings.
    pub fn allows_booking(&self) -> bool {
        matches!(
            self,
            EventState::Unconfirmed | EventState::ConfirmationRequested | EventState::Confirmed
        )
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Event {
    pub id: String,
    pub organizer_id: String,
    pub venue_id: String,
    pub name: String,
    /// Computed at creation as `requested OR venue.private`; immutable
    /// afterwards, it is a search-index key.
    pub private: bool,
    pub category: u32,
    pub category_description: String,
    pub state: EventState,
    pub state_changed_at: Option<DateTime<Utc>>,
    /// Weak: the event survives the conversation and vice versa.
    pub conversation_id: Option<String>,
    pub capacity: Capacity,
    pub start: DateTime<Utc>,
    /// 0 means unspecified, which leaves the end open.
    pub duration_secs: i64,
    pub end: Option<DateTime<Utc>>,
    /// Bookings and cancellations are refused after `start - notice_secs`.
    /// 0 means the window only opens at `start`.
    pub notice_secs: i64,
    pub bookings_count: u32,
    pub report_count: i64,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

pub struct NewEventParams {
    pub organizer_id: String,
    pub name: String,
    pub private: bool,
    pub category: u32,
    pub category_description: String,
    pub capacity: Capacity,
    pub start: DateTime<Utc>,
    pub duration_secs: i64,
    pub notice_secs: i64,
    pub conversation_id: Option<String>,
}

impl Event {
    pub fn new(params: NewEventParams, venue: &Venue) -> Result<Self, DomainError> {
        let capacity = resolve_capacity(params.capacity, venue.capacity, 0)?;

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            organizer_id: params.organizer_id,
            venue_id: venue.id.clone(),
            name: params.name,
            private: params.private || venue.private,
            category: params.category,
            category_description: params.category_description,
            state: if venue.confirmation_required {
                EventState::Unconfirmed
            } else {
                EventState::Confirmed
            },
            state_changed_at: None,
            conversation_id: params.conversation_id,
            capacity,
            start: params.start,
            duration_secs: params.duration_secs,
            end: calculate_end(params.start, params.duration_secs),
            notice_secs: params.notice_secs,
            bookings_count: 0,
            report_count: 0,
            images: Vec::new(),
            created_at: Utc::now(),
        })
    }

    fn set_state(&mut self, state: EventState, now: DateTime<Utc>) {
        self.state = state;
        self.state_changed_at = Some(now);
    }

    /// Called by the organizer.
    pub fn request_confirmation(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        match self.state {
            EventState::Unconfirmed => {}
            // Already on its way or there.
            EventState::ConfirmationRequested | EventState::Confirmed => return Ok(()),
            EventState::Rejected => return Err(DomainError::EventIsRejected),
            EventState::Canceled => return Err(DomainError::EventIsCanceled),
        }

        self.set_state(EventState::ConfirmationRequested, now);
        Ok(())
    }

    /// Called by the venue owner. Bypassing the request queue and reversing
    /// a rejection are both allowed.
    pub fn confirm(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        match self.state {
            EventState::Unconfirmed
            | EventState::ConfirmationRequested
            | EventState::Rejected => {}
            EventState::Confirmed => return Ok(()),
            EventState::Canceled => return Err(DomainError::EventIsCanceled),
        }

        self.set_state(EventState::Confirmed, now);
        Ok(())
    }

    /// Called by the venue owner.
    pub fn reject(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        match self.state {
            EventState::Unconfirmed | EventState::ConfirmationRequested => {}
            EventState::Rejected => return Ok(()),
            EventState::Confirmed => return Err(DomainError::EventIsConfirmed),
            EventState::Canceled => return Err(DomainError::EventIsCanceled),
        }

        self.set_state(EventState::Rejected, now);
        Ok(())
    }

    /// Returns true when the event actually transitioned, so the caller
    /// tears down the conversation at most once. Idempotent.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> bool {
        if self.state == EventState::Canceled {
            return false;
        }

        self.set_state(EventState::Canceled, now);
        true
    }

    /// Moving the event re-validates the reservation count against the new
    /// venue and recomputes the state as if the event had been organized
    /// there in the first place, discarding any prior rejection or pending
    /// request.
    pub fn set_venue(&mut self, venue: &Venue, now: DateTime<Utc>) -> Result<(), DomainError> {
        if let Capacity::Finite(vc) = venue.capacity {
            if self.bookings_count > vc {
                return Err(DomainError::InsufficientCapacity);
            }
        }

        self.venue_id = venue.id.clone();

        let state = if venue.confirmation_required {
            EventState::Unconfirmed
        } else {
            EventState::Confirmed
        };
        self.set_state(state, now);
        Ok(())
    }

    /// `Uninitialized` means "inherit the venue's capacity"; inheriting must
    /// never retroactively overbook.
    pub fn set_capacity(
        &mut self,
        requested: Capacity,
        venue_capacity: Capacity,
    ) -> Result<(), DomainError> {
        self.capacity = resolve_capacity(requested, venue_capacity, self.bookings_count)?;
        Ok(())
    }

    /// Once an event enters its window it stays within it: this is a
    /// function of wall-clock time, not stored state.
    pub fn is_in_window(&self, now: DateTime<Utc>) -> bool {
        if self.notice_secs > 0 {
            now > self.start - Duration::seconds(self.notice_secs)
        } else {
            now > self.start
        }
    }

    pub fn is_bookable(&self, now: DateTime<Utc>) -> bool {
        self.capacity.admits(self.bookings_count)
            && self.state.allows_booking()
            && !self.is_in_window(now)
    }

    /// Takes one seat. The overbooking check is folded into
    /// [`Event::is_bookable`].
    pub fn book(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if !self.is_bookable(now) {
            return Err(DomainError::EventNotBookable);
        }

        self.bookings_count += 1;
        Ok(())
    }

    /// Returns one seat to the pool. Going below zero is a programming
    /// error: bookings are the only callers and each holds exactly one seat.
    pub fn unbook(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.is_in_window(now) {
            return Err(DomainError::TooLate);
        }

        debug_assert!(self.bookings_count > 0);
        self.bookings_count = self.bookings_count.saturating_sub(1);
        Ok(())
    }

    pub fn report(&mut self) {
        self.report_count += 1;
    }

    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        name: String,
        category: u32,
        category_description: String,
        capacity: Capacity,
        start: DateTime<Utc>,
        duration_secs: i64,
        notice_secs: i64,
        venue_capacity: Capacity,
    ) -> Result<(), DomainError> {
        self.set_capacity(capacity, venue_capacity)?;
        self.name = name;
        self.category = category;
        self.category_description = category_description;
        self.start = start;
        self.duration_secs = duration_secs;
        self.end = calculate_end(start, duration_secs);
        self.notice_secs = notice_secs;
        Ok(())
    }
}

fn calculate_end(start: DateTime<Utc>, duration_secs: i64) -> Option<DateTime<Utc>> {
    if duration_secs == 0 {
        None
    } else {
        Some(start + Duration::seconds(duration_secs))
    }
}

fn resolve_capacity(
    requested: Capacity,
    venue_capacity: Capacity,
    bookings_count: u32,
) -> Result<Capacity, DomainError> {
    if requested.is_uninitialized() {
        if let Capacity::Finite(vc) = venue_capacity {
            if bookings_count > vc {
                // Already more bookings than the venue holds.
                return Err(DomainError::InvalidCapacity);
            }
        }

        return Ok(venue_capacity);
    }

    // Can't have more capacity than the venue.
    if let Capacity::Finite(vc) = venue_capacity {
        match requested {
            Capacity::Infinite => return Err(DomainError::InvalidCapacity),
            Capacity::Finite(n) if n > vc => return Err(DomainError::InvalidCapacity),
            _ => {}
        }
    }

    // Can't have less capacity than the number of bookings.
    if let Capacity::Finite(n) = requested {
        if bookings_count > n {
            return Err(DomainError::InvalidCapacity);
        }
    }

    Ok(requested)
}

impl FromRow<'_, SqliteRow> for Event {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let state_raw: String = row.try_get("state")?;
        let state = EventState::parse(&state_raw).ok_or_else(|| sqlx::Error::ColumnDecode {
            index: "state".into(),
            source: format!("unknown event state {state_raw:?}").into(),
        })?;

        let images_json: String = row.try_get("images_json")?;
        let images = serde_json::from_str(&images_json).map_err(|e| sqlx::Error::ColumnDecode {
            index: "images_json".into(),
            source: Box::new(e),
        })?;

        Ok(Self {
            id: row.try_get("id")?,
            organizer_id: row.try_get("organizer_id")?,
            venue_id: row.try_get("venue_id")?,
            name: row.try_get("name")?,
            private: row.try_get("private")?,
            category: row.try_get::<i64, _>("category")? as u32,
            category_description: row.try_get("category_description")?,
            state,
            state_changed_at: row.try_get("state_changed_at")?,
            conversation_id: row.try_get("conversation_id")?,
            capacity: Capacity::from_db(row.try_get("capacity")?),
            start: row.try_get("start_time")?,
            duration_secs: row.try_get("duration_secs")?,
            end: row.try_get("end_time")?,
            notice_secs: row.try_get("notice_secs")?,
            bookings_count: row.try_get::<i64, _>("bookings_count")? as u32,
            report_count: row.try_get("report_count")?,
            images,
            created_at: row.try_get("created_at")?,
        })
    }
}
