use crate::domain::models::booking::{Booking, BookingInput};
use crate::domain::models::event::Event;
use crate::domain::ports::{BookingRepository, EventRepository};
use crate::domain::services::normalize::normalize_email;
use crate::domain::services::validation::validate_booking;
use crate::error::AppError;
use std::sync::Arc;
use tracing::{info, warn};

pub struct BookingService {
    events: Arc<dyn EventRepository>,
    bookings: Arc<dyn BookingRepository>,
}

impl BookingService {
    pub fn new(events: Arc<dyn EventRepository>, bookings: Arc<dyn BookingRepository>) -> Self {
        Self { events, bookings }
    }

    /// Records a booking after confirming the referenced event exists.
    pub async fn create_booking(&self, input: BookingInput) -> Result<Booking, AppError> {
        let event_id = input.event_id.trim().to_string();
        let email = normalize_email(&input.email);

        validate_booking(&event_id, &email).into_result()?;

        if self.events.find_by_id(&event_id).await?.is_none() {
            warn!(event_id = %event_id, "Booking rejected: event does not exist");
            return Err(AppError::NotFound("Event not found".into()));
        }

        let booking = Booking::new(event_id, email);
        let created = self.bookings.create(&booking).await?;
        info!(booking_id = %created.id, event_id = %created.event_id, "Booking created");
        Ok(created)
    }

    pub async fn list_bookings_for_event(&self, slug: &str) -> Result<Vec<Booking>, AppError> {
        let event = self.event_by_slug(slug).await?;
        self.bookings.list_by_event(&event.id).await
    }

    pub async fn count_bookings_for_event(&self, slug: &str) -> Result<i64, AppError> {
        let event = self.event_by_slug(slug).await?;
        self.bookings.count_by_event(&event.id).await
    }

    async fn event_by_slug(&self, slug: &str) -> Result<Event, AppError> {
        self.events
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event '{}' not found", slug)))
    }
}
