use crate::domain::{models::event::Event, ports::{EventEntry, EventRepository}};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

pub struct SqliteEventRepo {
    pool: SqlitePool,
}

impl SqliteEventRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn images_json(event: &Event) -> Result<String, AppError> {
    serde_json::to_string(&event.images).map_err(|_| AppError::Internal)
}

#[async_trait]
impl EventRepository for SqliteEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            "INSERT INTO events (id, organizer_id, venue_id, name, private, category, category_description, state, state_changed_at, conversation_id, capacity, start_time, duration_secs, end_time, notice_secs, bookings_count, report_count, images_json, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&event.id).bind(&event.organizer_id).bind(&event.venue_id).bind(&event.name)
            .bind(event.private).bind(event.category as i64).bind(&event.category_description)
            .bind(event.state.as_str()).bind(event.state_changed_at).bind(&event.conversation_id)
            .bind(event.capacity.to_db()).bind(event.start).bind(event.duration_secs)
            .bind(event.end).bind(event.notice_secs).bind(event.bookings_count as i64)
            .bind(event.report_count).bind(images_json(event)?).bind(event.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    /// Does not touch `bookings_count`: the ledger column is only ever
    /// written by the guarded booking transactions, so a stale snapshot
    /// here cannot clobber a concurrent reservation.
    async fn update(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            "UPDATE events SET venue_id=?, name=?, category=?, category_description=?, state=?, state_changed_at=?, conversation_id=?, capacity=?, start_time=?, duration_secs=?, end_time=?, notice_secs=?, report_count=?, images_json=?
             WHERE id=?
             RETURNING *"
        )
            .bind(&event.venue_id).bind(&event.name).bind(event.category as i64).bind(&event.category_description)
            .bind(event.state.as_str()).bind(event.state_changed_at).bind(&event.conversation_id)
            .bind(event.capacity.to_db()).bind(event.start).bind(event.duration_secs).bind(event.end)
            .bind(event.notice_secs).bind(event.report_count)
            .bind(images_json(event)?)
            .bind(&event.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_organizer(&self, organizer_id: &str) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE organizer_id = ? ORDER BY start_time ASC").bind(organizer_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_public_by_venue(&self, venue_id: &str, after: DateTime<Utc>) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE venue_id = ? AND private = 0 AND start_time > ? ORDER BY start_time ASC").bind(venue_id).bind(after).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_index_entries(&self) -> Result<Vec<EventEntry>, AppError> {
        // Events are located where their venue is.
        let rows = sqlx::query(
            "SELECT e.id, e.organizer_id, v.latitude, v.longitude, e.private, e.category, e.start_time
             FROM events e JOIN venues v ON v.id = e.venue_id"
        )
            .fetch_all(&self.pool).await.map_err(AppError::Database)?;
        rows.iter()
            .map(|row| {
                Ok(EventEntry {
                    id: row.try_get("id")?,
                    organizer_id: row.try_get("organizer_id")?,
                    latitude: row.try_get("latitude")?,
                    longitude: row.try_get("longitude")?,
                    private: row.try_get("private")?,
                    category: row.try_get::<i64, _>("category")? as u32,
                    start: row.try_get("start_time")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(AppError::Database)
    }
}
