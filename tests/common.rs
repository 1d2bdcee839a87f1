use events_backend::{
    api::router::create_router,
    config::Config,
    domain::ports::{EmailService, PushService},
    domain::services::auth_service::AuthService,
    error::AppError,
    infra::conversation::sqlite_conversation_service::SqliteConversationService,
    infra::index::memory_index::{MemoryEventIndex, MemoryVenueIndex},
    infra::repositories::{
        sqlite_booking_repo::SqliteBookingRepo, sqlite_claim_repo::SqliteClaimRepo,
        sqlite_event_repo::SqliteEventRepo, sqlite_invite_repo::SqliteInviteRepo,
        sqlite_news_repo::SqliteNewsRepo, sqlite_open_invite_repo::SqliteOpenInviteRepo,
        sqlite_session_repo::SqliteSessionRepo, sqlite_user_repo::SqliteUserRepo,
        sqlite_venue_repo::SqliteVenueRepo,
    },
    state::AppState,
};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use std::str::FromStr;
use std::sync::Arc;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tera::Tera;
use tower::ServiceExt;
use uuid::Uuid;

pub struct MockEmailService;

#[async_trait]
impl EmailService for MockEmailService {
    async fn send(&self, _recipient: &str, _subject: &str, _html_body: &str) -> Result<(), AppError> {
        Ok(())
    }
}

pub struct MockPushService;

#[async_trait]
impl PushService for MockPushService {
    async fn send(&self, _device_token: &str, _message: &str) -> Result<(), AppError> {
        Ok(())
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let mut tera = Tera::default();
        tera.add_raw_template("invite.html", "<html>Invite to {{ event_name }}</html>")
            .unwrap();
        let templates = Arc::new(tera);

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            mail_service_url: "http://localhost".to_string(),
            mail_service_token: "token".to_string(),
            push_service_url: "http://localhost".to_string(),
            root_username: "root".to_string(),
            root_email: "root@example.com".to_string(),
            root_password: "root-secret".to_string(),
            venues_search_limit: 100,
            events_search_limit: 100,
            open_invite_contact_limit: 16,
            min_app_version: 1.0,
            index_refresh_secs: 3600,
        };

        let user_repo = Arc::new(SqliteUserRepo::new(pool.clone()));
        let session_repo = Arc::new(SqliteSessionRepo::new(pool.clone()));
        let auth_service = Arc::new(AuthService::new(user_repo.clone(), session_repo.clone()));
        auth_service
            .ensure_root(&config)
            .await
            .expect("Failed to seed root user");

        let state = Arc::new(AppState {
            config: config.clone(),
            user_repo,
            session_repo,
            venue_repo: Arc::new(SqliteVenueRepo::new(pool.clone())),
            claim_repo: Arc::new(SqliteClaimRepo::new(pool.clone())),
            event_repo: Arc::new(SqliteEventRepo::new(pool.clone())),
            booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
            invite_repo: Arc::new(SqliteInviteRepo::new(pool.clone())),
            open_invite_repo: Arc::new(SqliteOpenInviteRepo::new(pool.clone())),
            news_repo: Arc::new(SqliteNewsRepo::new(pool.clone())),
            venue_index: Arc::new(MemoryVenueIndex::new()),
            event_index: Arc::new(MemoryEventIndex::new()),
            conversation_service: Arc::new(SqliteConversationService::new(pool.clone())),
            auth_service,
            email_service: Arc::new(MockEmailService),
            push_service: Arc::new(MockPushService),
            templates,
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    /// No background worker in tests: refreshes on demand, so each test
    /// controls exactly what the search index sees.
    #[allow(dead_code)]
    pub async fn refresh_indexes(&self) {
        self.state
            .venue_index
            .refresh(self.state.venue_repo.as_ref())
            .await
            .unwrap();
        self.state
            .event_index
            .refresh(self.state.event_repo.as_ref())
            .await
            .unwrap();
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let body = match body {
            Some(json) => Body::from(json.to_string()),
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    /// Registers a fresh account and returns its bearer token and user id.
    #[allow(dead_code)]
    pub async fn register(&self, username: &str) -> (String, String) {
        let (status, body) = self
            .request(
                "POST",
                "/api/v1/auth/register",
                None,
                Some(serde_json::json!({
                    "username": username,
                    "email": format!("{}@example.com", username),
                    "password": "password123"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "registration failed: {:?}", body);

        (
            body["token"].as_str().unwrap().to_string(),
            body["user_id"].as_str().unwrap().to_string(),
        )
    }

    #[allow(dead_code)]
    pub async fn login_root(&self) -> String {
        let (status, body) = self
            .request(
                "POST",
                "/api/v1/auth/login",
                None,
                Some(serde_json::json!({
                    "username": "root",
                    "password": "root-secret"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "root login failed: {:?}", body);
        body["token"].as_str().unwrap().to_string()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}
