pub mod sqlite_booking_repo;
pub mod sqlite_claim_repo;
pub mod sqlite_event_repo;
pub mod sqlite_invite_repo;
pub mod sqlite_news_repo;
pub mod sqlite_open_invite_repo;
pub mod sqlite_session_repo;
pub mod sqlite_user_repo;
pub mod sqlite_venue_repo;
