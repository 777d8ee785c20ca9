mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{slot_at, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_provider_creates_and_lists_blocks() {
    let app = TestApp::new().await;
    let provider = app.register("provider", "Pedro").await;

    let blocks = app.open_block(&provider, slot_at(1, 9), slot_at(1, 12), false).await;
    assert_eq!(blocks.as_array().unwrap().len(), 1);

    // Every write answers with the full refreshed set.
    let blocks = app.open_block(&provider, slot_at(2, 9), slot_at(2, 10), true).await;
    let blocks = blocks.as_array().unwrap();
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0]["is_blockout"], false);
    assert_eq!(blocks[1]["is_blockout"], true);

    let (status, listed) = app.send("GET", "/api/v1/availability", Some(&provider.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_past_and_empty_blocks_are_rejected() {
    let app = TestApp::new().await;
    let provider = app.register("provider", "Pedro").await;

    let start = Utc::now() - Duration::hours(2);
    let (status, body) = app.send("POST", "/api/v1/availability", Some(&provider.token), Some(json!({
        "start_time": start,
        "end_time": start + Duration::hours(1),
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Cannot create availability in the past");

    let (status, _) = app.send("POST", "/api/v1/availability", Some(&provider.token), Some(json!({
        "start_time": slot_at(1, 10),
        "end_time": slot_at(1, 10),
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, listed) = app.send("GET", "/api/v1/availability", Some(&provider.token), None).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_clients_cannot_edit_availability() {
    let app = TestApp::new().await;
    let client = app.register("client", "Carla").await;

    let (status, _) = app.send("POST", "/api/v1/availability", Some(&client.token), Some(json!({
        "start_time": slot_at(1, 9),
        "end_time": slot_at(1, 10),
    }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.send("GET", "/api/v1/availability", Some(&client.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_delete_block_ownership_and_refresh() {
    let app = TestApp::new().await;
    let owner = app.register("provider", "Pedro").await;
    let other = app.register("provider", "Pablo").await;

    app.open_block(&owner, slot_at(1, 9), slot_at(1, 10), false).await;
    let blocks = app.open_block(&owner, slot_at(1, 14), slot_at(1, 16), false).await;
    let first_id = blocks[0]["id"].as_str().unwrap().to_string();

    let uri = format!("/api/v1/availability/{}", first_id);
    let (status, _) = app.send("DELETE", &uri, Some(&other.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, remaining) = app.send("DELETE", &uri, Some(&owner.token), None).await;
    assert_eq!(status, StatusCode::OK);
    let remaining = remaining.as_array().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_ne!(remaining[0]["id"], first_id.as_str());

    let (status, _) = app.send("DELETE", &uri, Some(&owner.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
