use crate::domain::ports::ConversationService;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Chat rooms attached to events. A separate subsystem in spirit; it lives
/// in the same database but only this adapter touches its tables.
pub struct SqliteConversationService {
    pool: SqlitePool,
}

impl SqliteConversationService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationService for SqliteConversationService {
    async fn build(&self, name: &str, owner_id: &str) -> Result<String, AppError> {
        let id = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO conversations (id, name, owner_id, published, created_at) VALUES (?, ?, ?, 1, ?)")
            .bind(&id).bind(name).bind(owner_id).bind(Utc::now())
            .execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(id)
    }
    async fn set_name(&self, conversation_id: &str, name: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE conversations SET name = ? WHERE id = ?")
            .bind(name).bind(conversation_id)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(())
    }
    async fn unpublish(&self, conversation_id: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE conversations SET published = 0 WHERE id = ?")
            .bind(conversation_id)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(())
    }
    async fn join(&self, conversation_id: &str, user_id: &str, display_name: &str) -> Result<String, AppError> {
        let id = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO participations (id, conversation_id, user_id, display_name, created_at) VALUES (?, ?, ?, ?, ?)")
            .bind(&id).bind(conversation_id).bind(user_id).bind(display_name).bind(Utc::now())
            .execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(id)
    }
    async fn leave(&self, participation_id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM participations WHERE id = ?")
            .bind(participation_id)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(())
    }
}
