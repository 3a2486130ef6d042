use devevent_backend::{
    api::router::create_router,
    config::{Config, TimePolicy},
    domain::{
        models::event::EventInput,
        ports::{BookingRepository, EventRepository},
        services::{booking_service::BookingService, event_service::EventService},
    },
    infra::{
        db::LazyPool,
        factory::sqlite_pool,
        repositories::{sqlite_booking_repo::SqliteBookingRepo, sqlite_event_repo::SqliteEventRepo},
    },
    state::AppState,
};
use axum::{
    body::Body,
    http::{header, Request},
    response::Response,
    Router,
};
use serde_json::Value;
use sqlx::Sqlite;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub db: Arc<LazyPool<Sqlite>>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        Self::with_policy(TimePolicy::Lenient).await
    }

    pub async fn with_policy(time_policy: TimePolicy) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let config = Config {
            database_url: db_url,
            port: 0,
            max_connections: Some(5),
            time_policy,
        };

        let db = Arc::new(sqlite_pool(&config).expect("Failed to configure test db"));

        let events: Arc<dyn EventRepository> = Arc::new(SqliteEventRepo::new(db.clone()));
        let bookings: Arc<dyn BookingRepository> = Arc::new(SqliteBookingRepo::new(db.clone()));

        let state = Arc::new(AppState {
            config: config.clone(),
            event_service: Arc::new(EventService::new(events.clone(), bookings.clone(), time_policy)),
            booking_service: Arc::new(BookingService::new(events, bookings)),
            database: db.clone(),
        });

        let router = create_router(state.clone());

        Self {
            router,
            db,
            db_filename,
            state,
        }
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> Response {
        self.send("POST", uri, Some(body)).await
    }

    pub async fn put_json(&self, uri: &str, body: &Value) -> Response {
        self.send("PUT", uri, Some(body)).await
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.send("GET", uri, None).await
    }

    pub async fn delete(&self, uri: &str) -> Response {
        self.send("DELETE", uri, None).await
    }

    async fn send(&self, method: &str, uri: &str, body: Option<&Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn booking_rows(&self) -> i64 {
        let pool = self.db.get().await.unwrap();
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bookings")
            .fetch_one(&pool)
            .await
            .unwrap()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}

#[allow(dead_code)]
pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[allow(dead_code)]
pub fn event_json(title: &str, tags: &[&str]) -> Value {
    serde_json::json!({
        "title": title,
        "description": "A gathering of developers",
        "overview": "Talks, workshops and networking",
        "image": "https://images.example.com/event.png",
        "venue": "Moscone Center",
        "location": "San Francisco, CA",
        "date": "2025-03-15",
        "time": "09:00",
        "mode": "hybrid",
        "audience": "Developers",
        "agenda": ["Opening", "Keynote"],
        "organizer": "DevEvent",
        "tags": tags,
    })
}

#[allow(dead_code)]
pub fn event_input(title: &str, tags: &[&str]) -> EventInput {
    EventInput {
        title: title.to_string(),
        description: "A gathering of developers".into(),
        overview: "Talks, workshops and networking".into(),
        image: "https://images.example.com/event.png".into(),
        venue: "Moscone Center".into(),
        location: "San Francisco, CA".into(),
        date: "2025-03-15".into(),
        time: "09:00".into(),
        mode: "hybrid".into(),
        audience: "Developers".into(),
        agenda: vec!["Opening".into(), "Keynote".into()],
        organizer: "DevEvent".into(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}
