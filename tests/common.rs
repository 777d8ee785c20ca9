use chambee_backend::{
    api::router::create_router,
    config::Config,
    domain::services::rut::check_digit,
    infra::factory::bootstrap_state,
    state::AppState,
};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

static NEXT_RUT: AtomicU32 = AtomicU32::new(15_000_000);

pub const TEST_PASSWORD: &str = "s3cret-password";

/// A fresh valid RUT for every call; the column is unique.
pub fn next_rut() -> String {
    let body = NEXT_RUT.fetch_add(1, Ordering::SeqCst);
    format!("{}-{}", body, check_digit(body))
}

/// `hour:00` UTC, `days` days from now.
pub fn slot_at(days: i64, hour: u32) -> DateTime<Utc> {
    (Utc::now() + Duration::days(days))
        .date_naive()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
        .and_utc()
}

#[allow(dead_code)]
pub struct TestUser {
    pub id: String,
    pub email: String,
    pub token: String,
    pub refresh_token: String,
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

pub fn test_config(database_url: String) -> Config {
    Config {
        database_url,
        port: 0,
        jwt_secret: "test-secret-that-is-at-least-32-bytes-long".to_string(),
        auth_issuer: "test-issuer".to_string(),
        default_timezone: chrono_tz::America::Santiago,
        default_duration_min: 60,
        log_dir: "./logs".to_string(),
    }
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let config = test_config(format!("sqlite://{}?mode=rwc", db_filename));

        let state = Arc::new(bootstrap_state(&config).await.expect("Failed to bootstrap test state"));
        let router = create_router(state.clone());

        Self { router, db_filename, state }
    }

    pub async fn send(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    pub async fn register(&self, role: &str, name: &str) -> TestUser {
        let email = format!("{}-{}@example.cl", name.to_lowercase(), Uuid::new_v4());
        let (status, body) = self.send("POST", "/api/v1/auth/register", None, Some(json!({
            "email": email,
            "password": TEST_PASSWORD,
            "display_name": name,
            "rut": next_rut(),
            "birth_date": "1990-01-15",
            "role": role,
        }))).await;

        if status != StatusCode::CREATED {
            panic!("Register failed in test helper: status {} body {}", status, body);
        }

        TestUser {
            id: body["user"]["id"].as_str().unwrap().to_string(),
            email,
            token: body["access_token"].as_str().unwrap().to_string(),
            refresh_token: body["refresh_token"].as_str().unwrap().to_string(),
        }
    }

    pub async fn open_block(&self, provider: &TestUser, start: DateTime<Utc>, end: DateTime<Utc>, is_blockout: bool) -> Value {
        let (status, body) = self.send("POST", "/api/v1/availability", Some(&provider.token), Some(json!({
            "start_time": start,
            "end_time": end,
            "is_blockout": is_blockout,
        }))).await;
        assert_eq!(status, StatusCode::CREATED, "create block failed: {}", body);
        body
    }

    pub async fn book(&self, client: &TestUser, provider: &TestUser, start: DateTime<Utc>, duration_minutes: i32) -> (StatusCode, Value) {
        self.send("POST", "/api/v1/appointments", Some(&client.token), Some(json!({
            "provider_id": provider.id,
            "start_time": start,
            "duration_minutes": duration_minutes,
            "notes": "Leaking kitchen tap",
        }))).await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
