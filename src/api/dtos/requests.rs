use crate::domain::models::{booking::BookingInput, event::{EventInput, EventPatch}};
use serde::Deserialize;

/// `agenda` and `tags` arrive either as JSON arrays or, from form-style
/// clients, as a JSON-encoded string or a comma-separated string.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum ListField {
    List(Vec<String>),
    Text(String),
}

impl Default for ListField {
    fn default() -> Self {
        ListField::List(Vec::new())
    }
}

impl ListField {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            ListField::List(items) => items,
            ListField::Text(raw) => {
                let raw = raw.trim();
                if raw.starts_with('[') {
                    if let Ok(items) = serde_json::from_str::<Vec<String>>(raw) {
                        return items;
                    }
                }
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            }
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateEventRequest {
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
    pub agenda: ListField,
    pub organizer: String,
    pub tags: ListField,
}

impl From<CreateEventRequest> for EventInput {
    fn from(req: CreateEventRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            overview: req.overview,
            image: req.image,
            venue: req.venue,
            location: req.location,
            date: req.date,
            time: req.time,
            mode: req.mode,
            audience: req.audience,
            agenda: req.agenda.into_vec(),
            organizer: req.organizer,
            tags: req.tags.into_vec(),
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateEventRequest {
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
    pub agenda: Option<ListField>,
    pub organizer: Option<String>,
    pub tags: Option<ListField>,
}

impl From<UpdateEventRequest> for EventPatch {
    fn from(req: UpdateEventRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            overview: req.overview,
            image: req.image,
            venue: req.venue,
            location: req.location,
            date: req.date,
            time: req.time,
            mode: req.mode,
            audience: req.audience,
            agenda: req.agenda.map(ListField::into_vec),
            organizer: req.organizer,
            tags: req.tags.map(ListField::into_vec),
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateBookingRequest {
    pub event_id: String,
    pub email: String,
}

impl From<CreateBookingRequest> for BookingInput {
    fn from(req: CreateBookingRequest) -> Self {
        Self {
            event_id: req.event_id,
            email: req.email,
        }
    }
}
