use crate::domain::{models::booking::Booking, ports::BookingRepository};
use crate::error::AppError;
use crate::infra::db::LazyPool;
use async_trait::async_trait;
use sqlx::Postgres;
use std::sync::Arc;

pub struct PostgresBookingRepo {
    db: Arc<LazyPool<Postgres>>,
}

impl PostgresBookingRepo {
    pub fn new(db: Arc<LazyPool<Postgres>>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepo {
    /// Inserts only while the referenced event exists.
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError> {
        let pool = self.db.get().await?;
        let created = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, event_id, email, created_at, updated_at)
             SELECT $1, $2, $3, $4, $5
             WHERE EXISTS (SELECT 1 FROM events WHERE id = $2)
             RETURNING *"
        )
            .bind(&booking.id).bind(&booking.event_id).bind(&booking.email)
            .bind(booking.created_at).bind(booking.updated_at)
            .fetch_optional(&pool).await;

        match created {
            Ok(Some(booking)) => Ok(booking),
            Ok(None) => Err(AppError::NotFound("Event not found".into())),
            Err(e) => {
                let e = AppError::Database(e);
                if e.is_foreign_key_violation() {
                    return Err(AppError::NotFound("Event not found".into()));
                }
                Err(e)
            }
        }
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Booking>, AppError> {
        let pool = self.db.get().await?;
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE event_id = $1 ORDER BY created_at DESC")
            .bind(event_id).fetch_all(&pool).await.map_err(AppError::Database)
    }

    async fn count_by_event(&self, event_id: &str) -> Result<i64, AppError> {
        let pool = self.db.get().await?;
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bookings WHERE event_id = $1")
            .bind(event_id).fetch_one(&pool).await.map_err(AppError::Database)
    }
}
