use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_root: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: String, email: String, password_hash: String, is_root: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username,
            email,
            password_hash,
            is_root,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    /// Push notification token of the device the session was opened from.
    pub device_token: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(token: String, user_id: String, device_token: Option<String>) -> Self {
        Self { token, user_id, device_token, created_at: Utc::now() }
    }
}

/// The identity a request resolves to. Privileged ("root") callers see and
/// may do everything; anonymous callers only touch public data.
#[derive(Debug, Clone)]
pub enum Caller {
    Anonymous,
    User(User),
}

impl Caller {
    pub fn from_option(user: Option<User>) -> Self {
        match user {
            Some(u) => Caller::User(u),
            None => Caller::Anonymous,
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self, Caller::User(u) if u.is_root)
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            Caller::User(u) => Some(&u.id),
            Caller::Anonymous => None,
        }
    }
}
