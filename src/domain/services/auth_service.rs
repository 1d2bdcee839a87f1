use std::sync::Arc;

use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::rngs::OsRng;
use rand::{distributions::Alphanumeric, Rng};
use tracing::info;

use crate::config::Config;
use crate::domain::models::invite::validate_email;
use crate::domain::models::user::{Session, User};
use crate::domain::ports::{SessionRepository, UserRepository};
use crate::error::AppError;

pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    session_repo: Arc<dyn SessionRepository>,
}

impl AuthService {
    pub fn new(user_repo: Arc<dyn UserRepository>, session_repo: Arc<dyn SessionRepository>) -> Self {
        Self { user_repo, session_repo }
    }

    /// Creates an account and immediately opens a session for it.
    pub async fn register(
        &self,
        username: String,
        email: String,
        password: &str,
        device_token: Option<String>,
    ) -> Result<(User, Session), AppError> {
        validate_email(&email)?;

        if self.user_repo.find_by_username(&username).await?.is_some() {
            return Err(AppError::Conflict("Username already exists".into()));
        }
        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".into()));
        }

        let password_hash = hash_password(password)?;
        let user = self
            .user_repo
            .create(&User::new(username, email, password_hash, false))
            .await?;

        info!("User registered: {}", user.id);

        let session = self.open_session(&user, device_token).await?;
        Ok((user, session))
    }

    pub async fn login(
        &self,
        username: &str,
        password: &str,
        device_token: Option<String>,
    ) -> Result<(User, Session), AppError> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let parsed_hash = PasswordHash::new(&user.password_hash).map_err(|_| AppError::Internal)?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| AppError::Unauthorized)?;

        info!("User logged in: {}", user.id);

        let session = self.open_session(&user, device_token).await?;
        Ok((user, session))
    }

    pub async fn logout(&self, token: &str) -> Result<(), AppError> {
        self.session_repo.delete(token).await
    }

    /// Idempotently provisions the privileged account configured at
    /// startup. Runs on every boot; a second run finds the account and
    /// does nothing.
    pub async fn ensure_root(&self, config: &Config) -> Result<User, AppError> {
        if let Some(existing) = self.user_repo.find_by_username(&config.root_username).await? {
            return Ok(existing);
        }

        let password_hash = hash_password(&config.root_password)?;
        let root = User::new(
            config.root_username.clone(),
            config.root_email.clone(),
            password_hash,
            true,
        );

        let created = self.user_repo.create(&root).await?;
        info!("Root user provisioned: {}", created.id);
        Ok(created)
    }

    async fn open_session(&self, user: &User, device_token: Option<String>) -> Result<Session, AppError> {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(48)
            .map(char::from)
            .collect();

        let session = Session::new(token, user.id.clone(), device_token);
        self.session_repo.create(&session).await?;
        Ok(session)
    }
}

fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AppError::Internal)?
        .to_string())
}
