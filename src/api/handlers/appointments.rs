use axum::{
    extract::{State, Path},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::CreateAppointmentRequest;
use crate::domain::models::appointment::AppointmentStatus;
use crate::domain::services::{
    booking_selector::BookingRequest,
    calendar::generate_ics,
    lifecycle::Party,
};
use crate::error::AppError;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.lifecycle.views_for(&auth.id).await?))
}

pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(payload): Json<CreateAppointmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!("create_appointment: provider {}", payload.provider_id);

    let created = state.booking_selector.request_appointment(&auth.id, BookingRequest {
        provider_id: payload.provider_id,
        start: payload.start_time,
        duration_minutes: payload.duration_minutes,
        notes: payload.notes,
    }, Utc::now()).await?;

    let view = state.lifecycle.view(&created.id, &auth.id).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(appointment_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.lifecycle.view(&appointment_id, &auth.id).await?))
}

pub async fn export_ics(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(appointment_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let view = state.lifecycle.view(&appointment_id, &auth.id).await?;
    if view.appointment.status != AppointmentStatus::Accepted {
        return Err(AppError::Conflict("Only accepted appointments can be exported".into()));
    }

    let counterpart_id = match view.party {
        Party::Client => &view.appointment.provider_id,
        Party::Provider => &view.appointment.client_id,
    };
    let counterpart = state.user_repo.find_by_id(counterpart_id).await?
        .map(|u| u.display_name)
        .unwrap_or_default();

    let ics = generate_ics(&view.appointment, view.job.as_ref(), &counterpart);
    let disposition = format!("attachment; filename=\"appointment-{}.ics\"", view.appointment.id);

    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        ics,
    ))
}
