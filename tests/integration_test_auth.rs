mod common;

use axum::http::StatusCode;
use common::{next_rut, TestApp, TEST_PASSWORD};
use serde_json::json;

#[tokio::test]
async fn test_register_login_and_profile() {
    let app = TestApp::new().await;
    let user = app.register("client", "Ana").await;

    let (status, body) = app.send("POST", "/api/v1/auth/login", None, Some(json!({
        "email": user.email.to_uppercase(),
        "password": TEST_PASSWORD,
    }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["user"]["role"], "client");
    assert!(body["user"].get("password_hash").is_none());

    let (status, me) = app.send("GET", "/api/v1/auth/me", Some(&user.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], user.id.as_str());

    let (status, updated) = app.send("PUT", "/api/v1/auth/me", Some(&user.token), Some(json!({
        "display_name": "  Ana María ",
        "phone": "+56 9 1234 5678",
    }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["display_name"], "Ana María");
    assert_eq!(updated["phone"], "+56 9 1234 5678");

    let (status, _) = app.send("PUT", "/api/v1/auth/me", Some(&user.token), Some(json!({
        "display_name": "   ",
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_wrong_password_and_missing_token_are_unauthorized() {
    let app = TestApp::new().await;
    let user = app.register("client", "Bruno").await;

    let (status, body) = app.send("POST", "/api/v1/auth/login", None, Some(json!({
        "email": user.email,
        "password": "not-the-password",
    }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = app.send("GET", "/api/v1/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.send("GET", "/api/v1/auth/me", Some("garbage.token.value"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_registration_rejects_bad_rut_and_minors() {
    let app = TestApp::new().await;

    let (status, body) = app.send("POST", "/api/v1/auth/register", None, Some(json!({
        "email": "rut@example.cl",
        "password": TEST_PASSWORD,
        "display_name": "Bad Rut",
        "rut": "12.345.678-9",
        "birth_date": "1990-01-01",
        "role": "client",
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().to_lowercase().contains("rut"));

    let (status, _) = app.send("POST", "/api/v1/auth/register", None, Some(json!({
        "email": "kid@example.cl",
        "password": TEST_PASSWORD,
        "display_name": "Too Young",
        "rut": next_rut(),
        "birth_date": chrono::Utc::now().date_naive().to_string(),
        "role": "client",
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_email_is_a_conflict() {
    let app = TestApp::new().await;
    let user = app.register("provider", "Carla").await;

    let (status, _) = app.send("POST", "/api/v1/auth/register", None, Some(json!({
        "email": user.email,
        "password": TEST_PASSWORD,
        "display_name": "Carla Again",
        "rut": next_rut(),
        "birth_date": "1985-03-10",
        "role": "provider",
    }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_refresh_rotates_and_logout_revokes() {
    let app = TestApp::new().await;
    let user = app.register("client", "Diego").await;

    let (status, rotated) = app.send("POST", "/api/v1/auth/refresh", None, Some(json!({
        "refresh_token": user.refresh_token,
    }))).await;
    assert_eq!(status, StatusCode::OK);
    let new_refresh = rotated["refresh_token"].as_str().unwrap().to_string();
    assert_ne!(new_refresh, user.refresh_token);

    // The old token was consumed by the rotation.
    let (status, _) = app.send("POST", "/api/v1/auth/refresh", None, Some(json!({
        "refresh_token": user.refresh_token,
    }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.send("POST", "/api/v1/auth/logout", None, Some(json!({
        "refresh_token": new_refresh,
    }))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.send("POST", "/api/v1/auth/refresh", None, Some(json!({
        "refresh_token": new_refresh,
    }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let (status, body) = app.send("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
