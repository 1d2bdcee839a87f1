use crate::domain::{models::news::News, ports::NewsRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteNewsRepo {
    pool: SqlitePool,
}

impl SqliteNewsRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NewsRepository for SqliteNewsRepo {
    async fn create(&self, news: &News) -> Result<News, AppError> {
        sqlx::query_as::<_, News>(
            "INSERT INTO news (id, venue_id, text, expires_at, created_at) VALUES (?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&news.id).bind(&news.venue_id).bind(&news.text).bind(news.expires_at).bind(news.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<News>, AppError> {
        sqlx::query_as::<_, News>("SELECT * FROM news WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM news WHERE id = ?").bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("News not found".into())); }
        Ok(())
    }
    async fn list_expiring_after(&self, after: DateTime<Utc>) -> Result<Vec<News>, AppError> {
        sqlx::query_as::<_, News>("SELECT * FROM news WHERE expires_at > ? ORDER BY expires_at ASC").bind(after).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
