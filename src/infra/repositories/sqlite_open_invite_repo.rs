use crate::domain::{models::invite::OpenInvite, ports::OpenInviteRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteOpenInviteRepo {
    pool: SqlitePool,
}

impl SqliteOpenInviteRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn contacts_json(invite: &OpenInvite) -> Result<String, AppError> {
    serde_json::to_string(&invite.contacts).map_err(|_| AppError::Internal)
}

#[async_trait]
impl OpenInviteRepository for SqliteOpenInviteRepo {
    async fn create(&self, invite: &OpenInvite) -> Result<OpenInvite, AppError> {
        sqlx::query_as::<_, OpenInvite>(
            "INSERT INTO open_invites (id, event_id, host_id, contacts_json, created_at) VALUES (?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&invite.id).bind(&invite.event_id).bind(&invite.host_id)
            .bind(contacts_json(invite)?).bind(invite.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<OpenInvite>, AppError> {
        sqlx::query_as::<_, OpenInvite>("SELECT * FROM open_invites WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn update(&self, invite: &OpenInvite) -> Result<OpenInvite, AppError> {
        sqlx::query_as::<_, OpenInvite>(
            "UPDATE open_invites SET contacts_json = ? WHERE id = ? RETURNING *"
        )
            .bind(contacts_json(invite)?).bind(&invite.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<OpenInvite>, AppError> {
        sqlx::query_as::<_, OpenInvite>("SELECT * FROM open_invites WHERE event_id = ? ORDER BY created_at ASC").bind(event_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
