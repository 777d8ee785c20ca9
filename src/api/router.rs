use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, delete},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{health, auth, availability, calendar, appointments, lifecycle};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/auth/me", get(auth::me).put(auth::update_me))

        // Booking Selector
        .route("/api/v1/providers/{provider_id}/calendar", get(calendar::get_calendar))

        // Availability Editor
        .route("/api/v1/availability", get(availability::list_blocks).post(availability::create_block))
        .route("/api/v1/availability/{block_id}", delete(availability::delete_block))

        // Appointments
        .route("/api/v1/appointments", get(appointments::list_appointments).post(appointments::create_appointment))
        .route("/api/v1/appointments/{appointment_id}", get(appointments::get_appointment))
        .route("/api/v1/appointments/{appointment_id}/ics", get(appointments::export_ics))

        // Lifecycle
        .route("/api/v1/appointments/{appointment_id}/accept", post(lifecycle::accept_appointment))
        .route("/api/v1/appointments/{appointment_id}/reject", post(lifecycle::reject_appointment))
        .route("/api/v1/appointments/{appointment_id}/job", post(lifecycle::propose_job))
        .route("/api/v1/appointments/{appointment_id}/job/accept", post(lifecycle::accept_job))
        .route("/api/v1/appointments/{appointment_id}/job/finalize", post(lifecycle::finalize_job))
        .route("/api/v1/appointments/{appointment_id}/job/confirm", post(lifecycle::confirm_job))
        .route("/api/v1/appointments/{appointment_id}/job/rate", post(lifecycle::rate_job))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
