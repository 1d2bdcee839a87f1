use std::sync::Arc;
use crate::domain::ports::{
    BookingRepository, ConversationService, EmailService, EventIndex, EventRepository,
    InviteRepository, NewsRepository, OpenInviteRepository, PushService, SessionRepository,
    UserRepository, VenueClaimRepository, VenueIndex, VenueRepository,
};
use crate::domain::services::auth_service::AuthService;
use crate::config::Config;
use tera::Tera;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub session_repo: Arc<dyn SessionRepository>,
    pub venue_repo: Arc<dyn VenueRepository>,
    pub claim_repo: Arc<dyn VenueClaimRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub invite_repo: Arc<dyn InviteRepository>,
    pub open_invite_repo: Arc<dyn OpenInviteRepository>,
    pub news_repo: Arc<dyn NewsRepository>,
    pub venue_index: Arc<dyn VenueIndex>,
    pub event_index: Arc<dyn EventIndex>,
    pub conversation_service: Arc<dyn ConversationService>,
    pub auth_service: Arc<AuthService>,
    pub email_service: Arc<dyn EmailService>,
    pub push_service: Arc<dyn PushService>,
    pub templates: Arc<Tera>,
}
