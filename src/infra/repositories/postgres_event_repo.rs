use crate::domain::{models::event::Event, ports::{EventRepository, SlugLookup}};
use crate::error::AppError;
use crate::infra::db::LazyPool;
use async_trait::async_trait;
use sqlx::{types::Json, Postgres};
use std::sync::Arc;

pub struct PostgresEventRepo {
    db: Arc<LazyPool<Postgres>>,
}

impl PostgresEventRepo {
    pub fn new(db: Arc<LazyPool<Postgres>>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SlugLookup for PostgresEventRepo {
    async fn slug_exists(&self, candidate: &str, exclude_id: Option<&str>) -> Result<bool, AppError> {
        let pool = self.db.get().await?;
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM events WHERE slug = $1 AND ($2::TEXT IS NULL OR id <> $2))",
        )
            .bind(candidate)
            .bind(exclude_id)
            .fetch_one(&pool)
            .await
            .map_err(AppError::Database)
    }
}

#[async_trait]
impl EventRepository for PostgresEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        let pool = self.db.get().await?;
        sqlx::query_as::<_, Event>(
            r#"INSERT INTO events (
                id, slug, title, description, overview, image, venue, location,
                date, time, mode, audience, agenda, organizer, tags, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING *"#
        )
            .bind(&event.id)
            .bind(&event.slug)
            .bind(&event.title)
            .bind(&event.description)
            .bind(&event.overview)
            .bind(&event.image)
            .bind(&event.venue)
            .bind(&event.location)
            .bind(&event.date)
            .bind(&event.time)
            .bind(&event.mode)
            .bind(&event.audience)
            .bind(Json(&event.agenda))
            .bind(&event.organizer)
            .bind(Json(&event.tags))
            .bind(event.created_at)
            .bind(event.updated_at)
            .fetch_one(&pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Event>, AppError> {
        let pool = self.db.get().await?;
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError> {
        let pool = self.db.get().await?;
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Event>, AppError> {
        let pool = self.db.get().await?;
        sqlx::query_as::<_, Event>("SELECT * FROM events ORDER BY created_at DESC")
            .fetch_all(&pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, event: &Event) -> Result<Event, AppError> {
        let pool = self.db.get().await?;
        sqlx::query_as::<_, Event>(
            r#"UPDATE events SET
                slug=$1, title=$2, description=$3, overview=$4, image=$5, venue=$6, location=$7,
                date=$8, time=$9, mode=$10, audience=$11, agenda=$12, organizer=$13, tags=$14, updated_at=$15
               WHERE id=$16 RETURNING *"#
        )
            .bind(&event.slug)
            .bind(&event.title)
            .bind(&event.description)
            .bind(&event.overview)
            .bind(&event.image)
            .bind(&event.venue)
            .bind(&event.location)
            .bind(&event.date)
            .bind(&event.time)
            .bind(&event.mode)
            .bind(&event.audience)
            .bind(Json(&event.agenda))
            .bind(&event.organizer)
            .bind(Json(&event.tags))
            .bind(event.updated_at)
            .bind(&event.id)
            .fetch_optional(&pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Event not found".into()))
    }

    async fn find_similar(&self, exclude_id: &str, tags: &[String], limit: i64) -> Result<Vec<Event>, AppError> {
        let pool = self.db.get().await?;
        sqlx::query_as::<_, Event>(
            r#"SELECT * FROM events
               WHERE id <> $1 AND tags ?| $2
               ORDER BY created_at DESC
               LIMIT $3"#
        )
            .bind(exclude_id)
            .bind(tags)
            .bind(limit)
            .fetch_all(&pool)
            .await
            .map_err(AppError::Database)
    }

    /// Removes the event only while it has no bookings.
    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let pool = self.db.get().await?;
        let result = sqlx::query("DELETE FROM events WHERE id = $1 AND NOT EXISTS (SELECT 1 FROM bookings WHERE event_id = $1)")
            .bind(id)
            .execute(&pool)
            .await;

        let result = match result {
            Ok(result) => result,
            Err(e) => {
                let e = AppError::Database(e);
                if e.is_foreign_key_violation() {
                    return Err(AppError::Conflict("Event has bookings and cannot be deleted".into()));
                }
                return Err(e);
            }
        };

        if result.rows_affected() == 0 {
            return match self.find_by_id(id).await? {
                Some(_) => Err(AppError::Conflict("Event has bookings and cannot be deleted".into())),
                None => Err(AppError::NotFound("Event not found".into())),
            };
        }
        Ok(())
    }
}
