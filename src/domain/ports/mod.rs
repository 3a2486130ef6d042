use crate::domain::models::{booking::Booking, event::Event};
use crate::error::AppError;
use async_trait::async_trait;

/// Existence check used by slug allocation. `exclude_id` skips the record being updated.
#[async_trait]
pub trait SlugLookup: Send + Sync {
    async fn slug_exists(&self, candidate: &str, exclude_id: Option<&str>) -> Result<bool, AppError>;
}

#[async_trait]
pub trait EventRepository: SlugLookup {
    async fn create(&self, event: &Event) -> Result<Event, AppError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Event>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError>;
    /// Newest first.
    async fn list(&self) -> Result<Vec<Event>, AppError>;
    async fn update(&self, event: &Event) -> Result<Event, AppError>;
    /// Events other than `exclude_id` sharing at least one of `tags`.
    async fn find_similar(&self, exclude_id: &str, tags: &[String], limit: i64) -> Result<Vec<Event>, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError>;
    /// Newest first.
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Booking>, AppError>;
    async fn count_by_event(&self, event_id: &str) -> Result<i64, AppError>;
}
