mod common;

use axum::http::StatusCode;
use common::{slot_at, TestApp, TestUser};
use serde_json::{json, Value};

async fn booked(app: &TestApp) -> (TestUser, TestUser, String) {
    let provider = app.register("provider", "Pedro").await;
    let client = app.register("client", "Alice").await;
    let (status, view) = app.book(&client, &provider, slot_at(1, 9), 60).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = view["appointment"]["id"].as_str().unwrap().to_string();
    (provider, client, id)
}

async fn act(app: &TestApp, user: &TestUser, id: &str, path: &str, body: Option<Value>) -> (StatusCode, Value) {
    app.send("POST", &format!("/api/v1/appointments/{}/{}", id, path), Some(&user.token), body).await
}

fn find<'a>(views: &'a Value, id: &str) -> &'a Value {
    views.as_array().unwrap().iter()
        .find(|v| v["appointment"]["id"] == id)
        .expect("appointment missing from reloaded list")
}

#[tokio::test]
async fn test_full_lifecycle_to_rated() {
    let app = TestApp::new().await;
    let (provider, client, id) = booked(&app).await;

    let (status, views) = act(&app, &provider, &id, "accept", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(find(&views, &id)["appointment"]["status"], "accepted");
    assert_eq!(find(&views, &id)["actions"], json!(["propose_job"]));

    let (status, views) = act(&app, &provider, &id, "job", Some(json!({
        "description": "Replace kitchen tap",
        "terms": "Parts included",
        "agreed_price": 45000,
    }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(find(&views, &id)["job"]["status"], "proposed");
    assert_eq!(find(&views, &id)["actions"], json!([]));

    let (status, views) = act(&app, &client, &id, "job/accept", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(find(&views, &id)["job"]["status"], "accepted");

    let (status, _) = act(&app, &provider, &id, "job/finalize", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, views) = act(&app, &client, &id, "job/confirm", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(find(&views, &id)["badge"]["label"], "Paid");

    let (status, views) = act(&app, &client, &id, "job/rate", Some(json!({
        "score": 5,
        "comment": "Fast and tidy work, thanks!",
    }))).await;
    assert_eq!(status, StatusCode::OK);
    let view = find(&views, &id);
    assert_eq!(view["job"]["status"], "rated");
    assert_eq!(view["job"]["rating"], 5);
    assert_eq!(view["badge"]["tone"], "success");
    assert_eq!(view["actions"], json!([]));

    // The provider's reload shows the same state.
    let (_, provider_view) = app.send("GET", &format!("/api/v1/appointments/{}", id), Some(&provider.token), None).await;
    assert_eq!(provider_view["party"], "provider");
    assert_eq!(provider_view["job"]["status"], "rated");
}

#[tokio::test]
async fn test_rejected_is_terminal() {
    let app = TestApp::new().await;
    let (provider, client, id) = booked(&app).await;

    let (status, views) = act(&app, &provider, &id, "reject", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(find(&views, &id)["actions"], json!([]));
    assert_eq!(find(&views, &id)["badge"]["label"], "Rejected");

    let (status, _) = act(&app, &provider, &id, "accept", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = act(&app, &provider, &id, "job", Some(json!({
        "description": "Anything",
        "agreed_price": 1000,
    }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, client_views) = app.send("GET", "/api/v1/appointments", Some(&client.token), None).await;
    assert_eq!(find(&client_views, &id)["actions"], json!([]));
}

#[tokio::test]
async fn test_wrong_party_and_strangers_are_forbidden() {
    let app = TestApp::new().await;
    let (_provider, client, id) = booked(&app).await;
    let stranger = app.register("client", "Eve").await;

    let (status, _) = act(&app, &client, &id, "accept", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = act(&app, &stranger, &id, "accept", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.send("GET", &format!("/api/v1/appointments/{}", id), Some(&stranger.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = act(&app, &client, "no-such-appointment", "job/accept", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_retrying_an_applied_action_is_harmless() {
    let app = TestApp::new().await;
    let (provider, _client, id) = booked(&app).await;

    let (_, first) = act(&app, &provider, &id, "accept", None).await;
    let (status, second) = act(&app, &provider, &id, "accept", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first, second);

    let (status, _) = act(&app, &provider, &id, "reject", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_rating_bounds() {
    let app = TestApp::new().await;
    let (provider, client, id) = booked(&app).await;

    act(&app, &provider, &id, "accept", None).await;
    act(&app, &provider, &id, "job", Some(json!({"description": "Paint fence", "agreed_price": 30000}))).await;
    act(&app, &client, &id, "job/accept", None).await;
    act(&app, &provider, &id, "job/finalize", None).await;
    act(&app, &client, &id, "job/confirm", None).await;

    let (status, _) = act(&app, &client, &id, "job/rate", Some(json!({"score": 0}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = act(&app, &client, &id, "job/rate", Some(json!({"score": 6}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = act(&app, &client, &id, "job/rate", Some(json!({"score": 4, "comment": "ok"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing was written by the rejected attempts.
    let (_, view) = app.send("GET", &format!("/api/v1/appointments/{}", id), Some(&client.token), None).await;
    assert_eq!(view["job"]["status"], "confirmed");
    assert!(view["job"]["rating"].is_null());

    let (status, _) = act(&app, &client, &id, "job/rate", Some(json!({"score": 4}))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_invalid_proposal_is_rejected() {
    let app = TestApp::new().await;
    let (provider, _client, id) = booked(&app).await;
    act(&app, &provider, &id, "accept", None).await;

    let (status, _) = act(&app, &provider, &id, "job", Some(json!({"description": "  ", "agreed_price": 1000}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = act(&app, &provider, &id, "job", Some(json!({"description": "Fix roof", "agreed_price": 0}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ics_export_requires_acceptance() {
    let app = TestApp::new().await;
    let (provider, client, id) = booked(&app).await;
    let uri = format!("/api/v1/appointments/{}/ics", id);

    let (status, _) = app.send("GET", &uri, Some(&client.token), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    act(&app, &provider, &id, "accept", None).await;

    let (status, body) = app.send("GET", &uri, Some(&client.token), None).await;
    assert_eq!(status, StatusCode::OK);
    let ics = body.as_str().unwrap();
    assert!(ics.contains("BEGIN:VCALENDAR"));
    assert!(ics.contains("ChamBee appointment with Pedro"));
}
