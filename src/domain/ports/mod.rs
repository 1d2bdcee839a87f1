use crate::domain::models::{
    booking::Booking,
    event::Event,
    geo::{Filter, Interval},
    invite::{Invite, OpenInvite},
    news::News,
    user::{Session, User},
    venue::{Venue, VenueClaim},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: &Session) -> Result<(), AppError>;
    async fn find_by_token(&self, token: &str) -> Result<Option<Session>, AppError>;
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Session>, AppError>;
    async fn delete(&self, token: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait VenueRepository: Send + Sync {
    async fn create(&self, venue: &Venue) -> Result<Venue, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Venue>, AppError>;
    async fn update(&self, venue: &Venue) -> Result<Venue, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Venue>, AppError>;
    /// Lightweight projection feeding the spatial index refresh.
    async fn list_index_entries(&self) -> Result<Vec<VenueEntry>, AppError>;
}

#[async_trait]
pub trait VenueClaimRepository: Send + Sync {
    async fn create(&self, claim: &VenueClaim) -> Result<VenueClaim, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<VenueClaim>, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    async fn list(&self) -> Result<Vec<VenueClaim>, AppError>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event) -> Result<Event, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError>;
    async fn update(&self, event: &Event) -> Result<Event, AppError>;
    async fn list_by_organizer(&self, organizer_id: &str) -> Result<Vec<Event>, AppError>;
    /// Public upcoming events at a venue, by start time.
    async fn list_public_by_venue(
        &self,
        venue_id: &str,
        after: DateTime<Utc>,
    ) -> Result<Vec<Event>, AppError>;
    /// Lightweight projection feeding the spatial index refresh.
    async fn list_index_entries(&self) -> Result<Vec<EventEntry>, AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts the booking and increments the event's reservation count in
    /// one transaction. The increment is guarded by the capacity check, so
    /// it is the authoritative ledger write: racing requests that both
    /// passed `is_bookable` on a stale read cannot both take the last
    /// seat; the loser fails with `EventNotBookable`.
    async fn create_with_event(&self, booking: &Booking, event_id: &str)
        -> Result<Booking, AppError>;
    /// Removes the booking and decrements the event's reservation count in
    /// one transaction. The count never drops below zero.
    async fn delete_with_event(&self, booking_id: &str, event_id: &str) -> Result<(), AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    /// Uniqueness probe for the one-booking-per-(event, guest) rule.
    /// Look-then-act: concurrent duplicate submissions can both pass; the
    /// unique index underneath turns the loser into a conflict.
    async fn find_by_event_and_guest(
        &self,
        event_id: &str,
        guest_id: &str,
    ) -> Result<Option<Booking>, AppError>;
    async fn update(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn list_by_guest(&self, guest_id: &str) -> Result<Vec<Booking>, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Booking>, AppError>;
}

#[async_trait]
pub trait InviteRepository: Send + Sync {
    async fn create(&self, invite: &Invite) -> Result<Invite, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Invite>, AppError>;
    /// Same look-then-act caveat as the booking probe.
    async fn find_by_event_and_guest(
        &self,
        event_id: &str,
        guest_id: &str,
    ) -> Result<Option<Invite>, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    async fn list_by_guest(&self, guest_id: &str) -> Result<Vec<Invite>, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Invite>, AppError>;
}

#[async_trait]
pub trait OpenInviteRepository: Send + Sync {
    async fn create(&self, invite: &OpenInvite) -> Result<OpenInvite, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<OpenInvite>, AppError>;
    async fn update(&self, invite: &OpenInvite) -> Result<OpenInvite, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<OpenInvite>, AppError>;
}

#[async_trait]
pub trait NewsRepository: Send + Sync {
    async fn create(&self, news: &News) -> Result<News, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<News>, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    /// Feed: news expiring soonest after `after`, ascending.
    async fn list_expiring_after(&self, after: DateTime<Utc>) -> Result<Vec<News>, AppError>;
}

/// Conversation subsystem, consumed on event creation/rename/cancellation
/// and on booking creation/cancellation. External collaborator; only the
/// contract matters here.
#[async_trait]
pub trait ConversationService: Send + Sync {
    async fn build(&self, name: &str, owner_id: &str) -> Result<String, AppError>;
    async fn set_name(&self, conversation_id: &str, name: &str) -> Result<(), AppError>;
    async fn unpublish(&self, conversation_id: &str) -> Result<(), AppError>;
    /// Returns the participation id.
    async fn join(
        &self,
        conversation_id: &str,
        user_id: &str,
        display_name: &str,
    ) -> Result<String, AppError>;
    async fn leave(&self, participation_id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait PushService: Send + Sync {
    async fn send(&self, device_token: &str, message: &str) -> Result<(), AppError>;
}

/// What the spatial index knows about a venue: exactly the predicate
/// dimensions a search can constrain, nothing else.
#[derive(Debug, Clone, PartialEq)]
pub struct VenueEntry {
    pub id: String,
    pub owner_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub private: bool,
    pub category: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventEntry {
    pub id: String,
    pub organizer_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub private: bool,
    pub category: u32,
    pub start: DateTime<Utc>,
}

/// One sub-partition of a venue search: each dimension is independently
/// "any" or fixed/interval.
#[derive(Debug, Clone)]
pub struct VenueQuery {
    pub owner: Filter<String>,
    pub latitude: Interval<f64>,
    pub longitude: Interval<f64>,
    pub private: Filter<bool>,
    pub category: Filter<u32>,
}

#[derive(Debug, Clone)]
pub struct EventQuery {
    pub organizer: Filter<String>,
    pub latitude: Interval<f64>,
    pub longitude: Interval<f64>,
    pub private: Filter<bool>,
    pub category: Filter<u32>,
    pub start: Interval<DateTime<Utc>>,
}

/// Spatial index over venues. Periodically refreshed from the entity
/// store; searches serve the last refreshed view, which may lag mutations
/// by up to the refresh interval.
#[async_trait]
pub trait VenueIndex: Send + Sync {
    /// Returns up to `limit` matching venue ids.
    fn search(&self, limit: usize, query: &VenueQuery) -> Vec<String>;
    fn len(&self) -> usize;
    async fn refresh(&self, repo: &dyn VenueRepository) -> Result<usize, AppError>;
}

#[async_trait]
pub trait EventIndex: Send + Sync {
    fn search(&self, limit: usize, query: &EventQuery) -> Vec<String>;
    fn len(&self) -> usize;
    async fn refresh(&self, repo: &dyn EventRepository) -> Result<usize, AppError>;
}
