mod common;

use async_trait::async_trait;
use axum::http::StatusCode;
use common::{event_input, event_json, parse_body, TestApp};
use devevent_backend::{
    config::TimePolicy,
    domain::{
        models::{booking::{Booking, BookingInput}, event::Event},
        ports::{BookingRepository, EventRepository, SlugLookup},
        services::{booking_service::BookingService, event_service::EventService},
    },
    error::AppError,
    infra::repositories::{sqlite_booking_repo::SqliteBookingRepo, sqlite_event_repo::SqliteEventRepo},
};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Notify;
use uuid::Uuid;

#[tokio::test]
async fn test_booking_normalizes_email() {
    let app = TestApp::new().await;

    let event = parse_body(app.post_json("/api/v1/events", &event_json("KubeCon", &["cloud"])).await).await;

    let res = app
        .post_json("/api/v1/bookings", &json!({ "eventId": event["id"], "email": "  Ada@Example.COM " }))
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let booking = parse_body(res).await;
    assert_eq!(booking["email"], "ada@example.com");
    assert_eq!(booking["eventId"], event["id"]);
    assert!(booking["createdAt"].is_string());
    assert_eq!(app.booking_rows().await, 1);
}

#[tokio::test]
async fn test_booking_for_missing_event_is_rejected() {
    let app = TestApp::new().await;

    let res = app
        .post_json("/api/v1/bookings", &json!({ "eventId": Uuid::new_v4().to_string(), "email": "a@b.com" }))
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.booking_rows().await, 0);

    let err = app
        .state
        .booking_service
        .create_booking(BookingInput { event_id: Uuid::new_v4().to_string(), email: "a@b.com".into() })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(app.booking_rows().await, 0);
}

#[tokio::test]
async fn test_booking_validation_reports_both_fields() {
    let app = TestApp::new().await;

    let res = app
        .post_json("/api/v1/bookings", &json!({ "eventId": "not-an-id", "email": "not-an-email" }))
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = parse_body(res).await;
    let fields: Vec<&str> = body["fields"].as_array().unwrap().iter().map(|f| f["field"].as_str().unwrap()).collect();
    assert_eq!(fields, vec!["eventId", "email"]);
    assert_eq!(app.booking_rows().await, 0);
}

#[tokio::test]
async fn test_list_bookings_for_event() {
    let app = TestApp::new().await;

    let event = parse_body(app.post_json("/api/v1/events", &event_json("JSConf", &["js"])).await).await;
    for email in ["one@example.com", "two@example.com"] {
        app.post_json("/api/v1/bookings", &json!({ "eventId": event["id"], "email": email })).await;
    }

    let res = app.get("/api/v1/events/jsconf/bookings").await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["bookings"][0]["email"], "two@example.com");
    assert_eq!(app.state.booking_service.count_bookings_for_event("jsconf").await.unwrap(), 2);

    assert_eq!(app.get("/api/v1/events/unknown/bookings").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_event_with_bookings_cannot_be_deleted() {
    let app = TestApp::new().await;

    let booked = parse_body(app.post_json("/api/v1/events", &event_json("Booked Event", &["x"])).await).await;
    app.post_json("/api/v1/events", &event_json("Empty Event", &["x"])).await;
    app.post_json("/api/v1/bookings", &json!({ "eventId": booked["id"], "email": "a@b.com" })).await;

    assert_eq!(app.delete("/api/v1/events/booked-event").await.status(), StatusCode::CONFLICT);
    assert_eq!(app.get("/api/v1/events/booked-event").await.status(), StatusCode::OK);

    assert_eq!(app.delete("/api/v1/events/empty-event").await.status(), StatusCode::OK);
    assert_eq!(app.get("/api/v1/events/empty-event").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.delete("/api/v1/events/empty-event").await.status(), StatusCode::NOT_FOUND);
}

/// Pauses between a read and the caller's follow-up write.
struct Gate {
    reached: Notify,
    release: Notify,
}

impl Gate {
    fn new() -> Arc<Self> {
        Arc::new(Self { reached: Notify::new(), release: Notify::new() })
    }

    async fn pause(&self) {
        self.reached.notify_one();
        self.release.notified().await;
    }
}

/// Holds `find_by_id` open after the event was seen.
struct GatedEventRepo {
    inner: SqliteEventRepo,
    gate: Arc<Gate>,
}

#[async_trait]
impl SlugLookup for GatedEventRepo {
    async fn slug_exists(&self, candidate: &str, exclude_id: Option<&str>) -> Result<bool, AppError> {
        self.inner.slug_exists(candidate, exclude_id).await
    }
}

#[async_trait]
impl EventRepository for GatedEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        self.inner.create(event).await
    }
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Event>, AppError> {
        self.inner.find_by_slug(slug).await
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError> {
        let found = self.inner.find_by_id(id).await?;
        self.gate.pause().await;
        Ok(found)
    }
    async fn list(&self) -> Result<Vec<Event>, AppError> {
        self.inner.list().await
    }
    async fn update(&self, event: &Event) -> Result<Event, AppError> {
        self.inner.update(event).await
    }
    async fn find_similar(&self, exclude_id: &str, tags: &[String], limit: i64) -> Result<Vec<Event>, AppError> {
        self.inner.find_similar(exclude_id, tags, limit).await
    }
    async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.inner.delete(id).await
    }
}

/// Holds `count_by_event` open after the count was taken.
struct GatedBookingRepo {
    inner: SqliteBookingRepo,
    gate: Arc<Gate>,
}

#[async_trait]
impl BookingRepository for GatedBookingRepo {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError> {
        self.inner.create(booking).await
    }
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Booking>, AppError> {
        self.inner.list_by_event(event_id).await
    }
    async fn count_by_event(&self, event_id: &str) -> Result<i64, AppError> {
        let count = self.inner.count_by_event(event_id).await?;
        self.gate.pause().await;
        Ok(count)
    }
}

#[tokio::test]
async fn test_booking_is_rejected_when_event_deleted_after_check() {
    let app = TestApp::new().await;
    let event = app.state.event_service.create_event(event_input("Race Day", &["race"])).await.unwrap();

    let gate = Gate::new();
    let events = Arc::new(GatedEventRepo { inner: SqliteEventRepo::new(app.db.clone()), gate: gate.clone() });
    let service = Arc::new(BookingService::new(events, Arc::new(SqliteBookingRepo::new(app.db.clone()))));

    let booking = {
        let service = service.clone();
        let event_id = event.id.clone();
        tokio::spawn(async move {
            service.create_booking(BookingInput { event_id, email: "late@example.com".into() }).await
        })
    };

    gate.reached.notified().await;
    app.state.event_service.delete_event("race-day").await.unwrap();
    gate.release.notify_one();

    let result = booking.await.unwrap();
    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert_eq!(app.booking_rows().await, 0);
    assert!(app.state.event_service.get_event_by_slug("race-day").await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_is_rejected_when_booking_lands_after_count() {
    let app = TestApp::new().await;
    let event = app.state.event_service.create_event(event_input("Race Day", &["race"])).await.unwrap();

    let gate = Gate::new();
    let bookings = Arc::new(GatedBookingRepo { inner: SqliteBookingRepo::new(app.db.clone()), gate: gate.clone() });
    let service = Arc::new(EventService::new(
        Arc::new(SqliteEventRepo::new(app.db.clone())),
        bookings,
        TimePolicy::Lenient,
    ));

    let delete = {
        let service = service.clone();
        tokio::spawn(async move { service.delete_event("race-day").await })
    };

    gate.reached.notified().await;
    app.state
        .booking_service
        .create_booking(BookingInput { event_id: event.id.clone(), email: "early@example.com".into() })
        .await
        .unwrap();
    gate.release.notify_one();

    let result = delete.await.unwrap();
    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert_eq!(app.booking_rows().await, 1);
    assert!(app.state.event_service.get_event_by_slug("race-day").await.unwrap().is_some());
}
