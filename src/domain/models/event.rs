use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub mode: String,
    pub audience: String,
    #[sqlx(json)]
    pub agenda: Vec<String>,
    pub organizer: String,
    #[sqlx(json)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new event. The slug is never part of the input.
#[derive(Debug, Clone, Default)]
pub struct EventInput {
    pub title: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub mode: String,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub overview: Option<String>,
    pub image: Option<String>,
    pub venue: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub mode: Option<String>,
    pub audience: Option<String>,
    pub agenda: Option<Vec<String>>,
    pub organizer: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl Event {
    /// A not-yet-persisted record. Slug is empty until allocation runs.
    pub fn new(input: EventInput) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            slug: String::new(),
            title: input.title.trim().to_string(),
            description: input.description.trim().to_string(),
            overview: input.overview.trim().to_string(),
            image: input.image.trim().to_string(),
            venue: input.venue.trim().to_string(),
            location: input.location.trim().to_string(),
            date: input.date.trim().to_string(),
            time: input.time.trim().to_string(),
            mode: input.mode.trim().to_string(),
            audience: input.audience.trim().to_string(),
            agenda: input.agenda,
            organizer: input.organizer.trim().to_string(),
            tags: input.tags,
            created_at: now,
            updated_at: now,
        }
    }
}
