use crate::domain::{models::venue::Venue, ports::{VenueEntry, VenueRepository}};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

pub struct SqliteVenueRepo {
    pool: SqlitePool,
}

impl SqliteVenueRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn images_json(venue: &Venue) -> Result<String, AppError> {
    serde_json::to_string(&venue.images).map_err(|_| AppError::Internal)
}

#[async_trait]
impl VenueRepository for SqliteVenueRepo {
    async fn create(&self, venue: &Venue) -> Result<Venue, AppError> {
        sqlx::query_as::<_, Venue>(
            "INSERT INTO venues (id, owner_id, name, private, category, category_description, latitude, longitude, address, capacity, description, confirmation_required, images_json, rating, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&venue.id).bind(&venue.owner_id).bind(&venue.name).bind(venue.private)
            .bind(venue.category as i64).bind(&venue.category_description)
            .bind(venue.position.latitude).bind(venue.position.longitude).bind(&venue.address)
            .bind(venue.capacity.to_db()).bind(&venue.description).bind(venue.confirmation_required)
            .bind(images_json(venue)?).bind(venue.rating).bind(venue.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Venue>, AppError> {
        sqlx::query_as::<_, Venue>("SELECT * FROM venues WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn update(&self, venue: &Venue) -> Result<Venue, AppError> {
        sqlx::query_as::<_, Venue>(
            "UPDATE venues SET owner_id=?, name=?, category=?, category_description=?, address=?, capacity=?, description=?, confirmation_required=?, images_json=?, rating=?
             WHERE id=?
             RETURNING *"
        )
            .bind(&venue.owner_id).bind(&venue.name).bind(venue.category as i64).bind(&venue.category_description)
            .bind(&venue.address).bind(venue.capacity.to_db()).bind(&venue.description)
            .bind(venue.confirmation_required).bind(images_json(venue)?).bind(venue.rating)
            .bind(&venue.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM venues WHERE id = ?").bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Venue not found".into())); }
        Ok(())
    }
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Venue>, AppError> {
        sqlx::query_as::<_, Venue>("SELECT * FROM venues WHERE owner_id = ? ORDER BY name ASC").bind(owner_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_index_entries(&self) -> Result<Vec<VenueEntry>, AppError> {
        let rows = sqlx::query("SELECT id, owner_id, latitude, longitude, private, category FROM venues")
            .fetch_all(&self.pool).await.map_err(AppError::Database)?;
        rows.iter()
            .map(|row| {
                Ok(VenueEntry {
                    id: row.try_get("id")?,
                    owner_id: row.try_get("owner_id")?,
                    latitude: row.try_get("latitude")?,
                    longitude: row.try_get("longitude")?,
                    private: row.try_get("private")?,
                    category: row.try_get::<i64, _>("category")? as u32,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(AppError::Database)
    }
}
