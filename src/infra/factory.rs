use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{ConnectOptions, SqlitePool};
use tracing::info;
use tracing::log::LevelFilter;
use tera::Tera;

use crate::config::Config;
use crate::domain::ports::{EventIndex, VenueIndex};
use crate::state::AppState;
use crate::domain::services::auth_service::AuthService;
use crate::infra::conversation::sqlite_conversation_service::SqliteConversationService;
use crate::infra::email::http_email_service::HttpEmailService;
use crate::infra::index::memory_index::{MemoryEventIndex, MemoryVenueIndex};
use crate::infra::push::http_push_service::HttpPushService;
use crate::infra::repositories::{
    sqlite_booking_repo::SqliteBookingRepo, sqlite_claim_repo::SqliteClaimRepo,
    sqlite_event_repo::SqliteEventRepo, sqlite_invite_repo::SqliteInviteRepo,
    sqlite_news_repo::SqliteNewsRepo, sqlite_open_invite_repo::SqliteOpenInviteRepo,
    sqlite_session_repo::SqliteSessionRepo, sqlite_user_repo::SqliteUserRepo,
    sqlite_venue_repo::SqliteVenueRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    info!("Initializing SQLite connection with WAL Mode...");

    let opts = SqliteConnectOptions::from_str(&config.database_url)
        .expect("Invalid SQLite connection string")
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await
        .expect("Failed to connect to SQLite");

    run_migrations(&pool).await;

    let mut tera = Tera::default();
    tera.add_raw_template("invite.html", include_str!("../templates/invite.html"))
        .expect("Failed to load invite template");
    let templates = Arc::new(tera);

    let user_repo = Arc::new(SqliteUserRepo::new(pool.clone()));
    let session_repo = Arc::new(SqliteSessionRepo::new(pool.clone()));
    let venue_repo = Arc::new(SqliteVenueRepo::new(pool.clone()));
    let event_repo = Arc::new(SqliteEventRepo::new(pool.clone()));
    let auth_service = Arc::new(AuthService::new(user_repo.clone(), session_repo.clone()));

    let root = auth_service
        .ensure_root(config)
        .await
        .expect("Failed to provision root user");
    info!("Root account ready: {}", root.username);

    let venue_index = Arc::new(MemoryVenueIndex::new());
    let event_index = Arc::new(MemoryEventIndex::new());
    if let Err(e) = venue_index.refresh(venue_repo.as_ref()).await {
        tracing::warn!("Initial venue index refresh failed: {}", e);
    }
    if let Err(e) = event_index.refresh(event_repo.as_ref()).await {
        tracing::warn!("Initial event index refresh failed: {}", e);
    }

    AppState {
        config: config.clone(),
        user_repo,
        session_repo,
        venue_repo,
        claim_repo: Arc::new(SqliteClaimRepo::new(pool.clone())),
        event_repo,
        booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
        invite_repo: Arc::new(SqliteInviteRepo::new(pool.clone())),
        open_invite_repo: Arc::new(SqliteOpenInviteRepo::new(pool.clone())),
        news_repo: Arc::new(SqliteNewsRepo::new(pool.clone())),
        venue_index,
        event_index,
        conversation_service: Arc::new(SqliteConversationService::new(pool.clone())),
        auth_service,
        email_service: Arc::new(HttpEmailService::new(
            config.mail_service_url.clone(),
            config.mail_service_token.clone(),
        )),
        push_service: Arc::new(HttpPushService::new(config.push_service_url.clone())),
        templates,
    }
}

async fn run_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
