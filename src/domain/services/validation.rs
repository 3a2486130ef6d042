use crate::config::TimePolicy;
use crate::domain::models::event::Event;
use crate::domain::services::normalize::{is_canonical_time, is_valid_email};
use crate::error::ValidationErrors;
use uuid::Uuid;

/// Checks every field of an event draft and reports all failures together.
pub fn validate_event(event: &Event, time_policy: TimePolicy) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    let required = [
        ("title", &event.title),
        ("description", &event.description),
        ("overview", &event.overview),
        ("image", &event.image),
        ("venue", &event.venue),
        ("location", &event.location),
        ("date", &event.date),
        ("time", &event.time),
        ("mode", &event.mode),
        ("audience", &event.audience),
        ("organizer", &event.organizer),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            errors.add(field, format!("{} is required", field));
        }
    }

    if event.agenda.is_empty() {
        errors.add("agenda", "agenda must contain at least one item");
    } else if event.agenda.iter().any(|item| item.trim().is_empty()) {
        errors.add("agenda", "agenda items must not be blank");
    }

    if event.tags.is_empty() {
        errors.add("tags", "tags must contain at least one item");
    } else if event.tags.iter().any(|tag| tag.trim().is_empty()) {
        errors.add("tags", "tags must not be blank");
    }

    if time_policy == TimePolicy::Strict && !event.time.is_empty() && !is_canonical_time(&event.time) {
        errors.add("time", "time must be in HH:MM 24-hour format");
    }

    errors
}

/// `email` is expected already trimmed and lowercased.
pub fn validate_booking(event_id: &str, email: &str) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if event_id.trim().is_empty() {
        errors.add("eventId", "eventId is required");
    } else if Uuid::parse_str(event_id.trim()).is_err() {
        errors.add("eventId", "eventId is not a valid identifier");
    }

    if email.is_empty() {
        errors.add("email", "email is required");
    } else if !is_valid_email(email) {
        errors.add("email", "email is not a valid address");
    }

    errors
}
