use crate::config::TimePolicy;
use crate::domain::models::event::{Event, EventInput, EventPatch};
use crate::domain::ports::{BookingRepository, EventRepository};
use crate::domain::services::normalize::{normalize_date, normalize_time};
use crate::domain::services::slug::allocate_slug;
use crate::domain::services::validation::validate_event;
use crate::error::AppError;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

pub const SIMILAR_EVENTS_LIMIT: i64 = 6;

/// Allocate-then-write rounds before a slug race is reported to the caller.
pub const MAX_WRITE_ATTEMPTS: usize = 5;

pub struct EventService {
    events: Arc<dyn EventRepository>,
    bookings: Arc<dyn BookingRepository>,
    time_policy: TimePolicy,
}

impl EventService {
    pub fn new(
        events: Arc<dyn EventRepository>,
        bookings: Arc<dyn BookingRepository>,
        time_policy: TimePolicy,
    ) -> Self {
        Self { events, bookings, time_policy }
    }

    pub async fn create_event(&self, input: EventInput) -> Result<Event, AppError> {
        let mut event = Event::new(input);
        event.date = normalize_date(&event.date);
        event.time = normalize_time(&event.time);

        validate_event(&event, self.time_policy).into_result()?;

        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            event.slug = allocate_slug(&event.title, Some(event.id.as_str()), &*self.events).await?;
            event.updated_at = Utc::now();

            match self.events.create(&event).await {
                Ok(created) => {
                    info!(event_id = %created.id, slug = %created.slug, "Event created");
                    return Ok(created);
                }
                Err(e) if e.is_unique_violation() => {
                    warn!(attempt, slug = %event.slug, "Slug taken by a concurrent write, re-allocating");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::Conflict(format!(
            "Could not assign a unique slug for '{}'",
            event.title
        )))
    }

    /// Applies `patch` to the event currently at `slug`. The slug is re-derived
    /// only when the title changes.
    pub async fn update_event(&self, slug: &str, patch: EventPatch) -> Result<Event, AppError> {
        let current = self
            .events
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event '{}' not found", slug)))?;

        let mut event = current.clone();
        apply_patch(&mut event, patch);

        if event.date != current.date {
            event.date = normalize_date(&event.date);
        }
        if event.time != current.time {
            event.time = normalize_time(&event.time);
        }

        validate_event(&event, self.time_policy).into_result()?;

        let reallocate = event.title != current.title || event.slug.is_empty();

        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            if reallocate {
                event.slug = allocate_slug(&event.title, Some(event.id.as_str()), &*self.events).await?;
            }
            event.updated_at = Utc::now();

            match self.events.update(&event).await {
                Ok(updated) => {
                    info!(event_id = %updated.id, slug = %updated.slug, "Event updated");
                    return Ok(updated);
                }
                Err(e) if reallocate && e.is_unique_violation() => {
                    warn!(attempt, slug = %event.slug, "Slug taken by a concurrent write, re-allocating");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::Conflict(format!(
            "Could not assign a unique slug for '{}'",
            event.title
        )))
    }

    pub async fn get_event_by_slug(&self, slug: &str) -> Result<Option<Event>, AppError> {
        self.events.find_by_slug(slug).await
    }

    pub async fn list_events(&self) -> Result<Vec<Event>, AppError> {
        self.events.list().await
    }

    /// Up to six other events sharing a tag with the event at `slug`.
    /// Lookup failures degrade to an empty list.
    pub async fn similar_events(&self, slug: &str) -> Vec<Event> {
        match self.find_similar(slug).await {
            Ok(events) => events,
            Err(e) => {
                warn!(slug = %slug, error = %e, "Similar events lookup failed");
                Vec::new()
            }
        }
    }

    async fn find_similar(&self, slug: &str) -> Result<Vec<Event>, AppError> {
        let Some(anchor) = self.events.find_by_slug(slug).await? else {
            return Ok(Vec::new());
        };
        if anchor.tags.is_empty() {
            return Ok(Vec::new());
        }
        self.events
            .find_similar(&anchor.id, &anchor.tags, SIMILAR_EVENTS_LIMIT)
            .await
    }

    /// Deletes the event at `slug`. Events that still have bookings are kept,
    /// including ones booked after the count below was taken.
    pub async fn delete_event(&self, slug: &str) -> Result<(), AppError> {
        let event = self
            .events
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event '{}' not found", slug)))?;

        let bookings = self.bookings.count_by_event(&event.id).await?;
        if bookings > 0 {
            return Err(AppError::Conflict(format!(
                "Event '{}' has {} booking(s) and cannot be deleted",
                slug, bookings
            )));
        }

        self.events.delete(&event.id).await?;
        info!(event_id = %event.id, slug = %slug, "Event deleted");
        Ok(())
    }
}

fn apply_patch(event: &mut Event, patch: EventPatch) {
    let text_fields = [
        (patch.title, &mut event.title),
        (patch.description, &mut event.description),
        (patch.overview, &mut event.overview),
        (patch.image, &mut event.image),
        (patch.venue, &mut event.venue),
        (patch.location, &mut event.location),
        (patch.date, &mut event.date),
        (patch.time, &mut event.time),
        (patch.mode, &mut event.mode),
        (patch.audience, &mut event.audience),
        (patch.organizer, &mut event.organizer),
    ];
    for (value, slot) in text_fields {
        if let Some(val) = value {
            *slot = val.trim().to_string();
        }
    }
    if let Some(val) = patch.agenda { event.agenda = val; }
    if let Some(val) = patch.tags { event.tags = val; }
}
