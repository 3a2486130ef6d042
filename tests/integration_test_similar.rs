mod common;

use axum::http::StatusCode;
use common::{event_input, event_json, parse_body, TestApp};
use serde_json::Value;

fn slugs(body: &Value) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|e| e["slug"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_similar_events_excludes_anchor_and_caps_at_six() {
    let app = TestApp::new().await;

    for i in 0..8 {
        let res = app.post_json("/api/v1/events", &event_json(&format!("AI Forum {}", i), &["ai"])).await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = app.get("/api/v1/events/ai-forum-0/similar").await;
    assert_eq!(res.status(), StatusCode::OK);

    let similar = slugs(&parse_body(res).await);
    assert_eq!(similar.len(), 6);
    assert!(!similar.contains(&"ai-forum-0".to_string()));
}

#[tokio::test]
async fn test_similar_events_require_tag_overlap() {
    let app = TestApp::new().await;
    let service = &app.state.event_service;

    service.create_event(event_input("Anchor", &["rust", "wasm"])).await.unwrap();
    service.create_event(event_input("Partial Overlap", &["wasm", "web"])).await.unwrap();
    service.create_event(event_input("Full Overlap", &["rust", "wasm"])).await.unwrap();
    service.create_event(event_input("No Overlap", &["python"])).await.unwrap();

    let mut found: Vec<String> = service.similar_events("anchor").await.into_iter().map(|e| e.slug).collect();
    found.sort();
    assert_eq!(found, vec!["full-overlap", "partial-overlap"]);
}

#[tokio::test]
async fn test_similar_events_for_unknown_slug_is_empty() {
    let app = TestApp::new().await;

    let res = app.get("/api/v1/events/does-not-exist/similar").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(parse_body(res).await.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_similar_events_returns_string_ids() {
    let app = TestApp::new().await;
    app.post_json("/api/v1/events", &event_json("Go Day", &["go"])).await;
    app.post_json("/api/v1/events", &event_json("Go Night", &["go"])).await;

    let body = parse_body(app.get("/api/v1/events/go-day/similar").await).await;
    let first = &body.as_array().unwrap()[0];
    assert_eq!(first["slug"], "go-night");
    assert!(first["id"].is_string());
}
