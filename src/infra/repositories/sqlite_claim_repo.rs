use crate::domain::{models::venue::VenueClaim, ports::VenueClaimRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteClaimRepo {
    pool: SqlitePool,
}

impl SqliteClaimRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VenueClaimRepository for SqliteClaimRepo {
    async fn create(&self, claim: &VenueClaim) -> Result<VenueClaim, AppError> {
        sqlx::query_as::<_, VenueClaim>(
            "INSERT INTO venue_claims (id, venue_id, user_id, created_at) VALUES (?, ?, ?, ?) RETURNING *"
        )
            .bind(&claim.id).bind(&claim.venue_id).bind(&claim.user_id).bind(claim.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<VenueClaim>, AppError> {
        sqlx::query_as::<_, VenueClaim>("SELECT * FROM venue_claims WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM venue_claims WHERE id = ?").bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Claim not found".into())); }
        Ok(())
    }
    async fn list(&self) -> Result<Vec<VenueClaim>, AppError> {
        sqlx::query_as::<_, VenueClaim>("SELECT * FROM venue_claims ORDER BY created_at ASC").fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
