use crate::domain::{models::booking::Booking, ports::BookingRepository};
use crate::error::{AppError, DomainError};
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn create_with_event(&self, booking: &Booking, event_id: &str) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        // The caller's bookability check ran against a possibly stale read;
        // the guard re-checks capacity under the transaction.
        let ledger = sqlx::query(
            "UPDATE events SET bookings_count = bookings_count + 1
             WHERE id = ? AND (capacity < 0 OR bookings_count < capacity)"
        )
            .bind(event_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        if ledger.rows_affected() == 0 {
            return Err(DomainError::EventNotBookable.into());
        }
        let created = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, event_id, host_id, guest_id, participation_id, note, checked_in_at, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&booking.id).bind(&booking.event_id).bind(&booking.host_id).bind(&booking.guest_id)
            .bind(&booking.participation_id).bind(&booking.note).bind(booking.checked_in_at).bind(booking.created_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }
    async fn delete_with_event(&self, booking_id: &str, event_id: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let result = sqlx::query("DELETE FROM bookings WHERE id = ?").bind(booking_id).execute(&mut *tx).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Booking not found".into())); }
        // A booking existed, so the count is at least one; anything else is
        // a corrupted ledger.
        let ledger = sqlx::query(
            "UPDATE events SET bookings_count = bookings_count - 1
             WHERE id = ? AND bookings_count > 0"
        )
            .bind(event_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        if ledger.rows_affected() == 0 {
            return Err(AppError::Internal);
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_event_and_guest(&self, event_id: &str, guest_id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE event_id = ? AND guest_id = ?").bind(event_id).bind(guest_id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn update(&self, booking: &Booking) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET host_id=?, participation_id=?, note=?, checked_in_at=? WHERE id=? RETURNING *"
        )
            .bind(&booking.host_id).bind(&booking.participation_id).bind(&booking.note).bind(booking.checked_in_at)
            .bind(&booking.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_guest(&self, guest_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE guest_id = ? ORDER BY created_at ASC").bind(guest_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE event_id = ? ORDER BY created_at ASC").bind(event_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
