use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::{ProposeJobRequest, RateJobRequest};
use crate::domain::services::lifecycle::{AppointmentView, Command};
use crate::error::AppError;
use std::sync::Arc;

async fn perform(state: &AppState, appointment_id: &str, auth: &AuthUser, command: Command) -> Result<Json<Vec<AppointmentView>>, AppError> {
    let views = state.lifecycle.perform(appointment_id, &auth.id, command).await?;
    Ok(Json(views))
}

pub async fn accept_appointment(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(appointment_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    perform(&state, &appointment_id, &auth, Command::Accept).await
}

pub async fn reject_appointment(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(appointment_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    perform(&state, &appointment_id, &auth, Command::Reject).await
}

pub async fn propose_job(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(appointment_id): Path<String>,
    Json(payload): Json<ProposeJobRequest>,
) -> Result<impl IntoResponse, AppError> {
    perform(&state, &appointment_id, &auth, Command::ProposeJob {
        description: payload.description,
        terms: payload.terms,
        agreed_price: payload.agreed_price,
    }).await
}

pub async fn accept_job(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(appointment_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    perform(&state, &appointment_id, &auth, Command::AcceptProposal).await
}

pub async fn finalize_job(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(appointment_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    perform(&state, &appointment_id, &auth, Command::Finalize).await
}

pub async fn confirm_job(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(appointment_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    perform(&state, &appointment_id, &auth, Command::Confirm).await
}

pub async fn rate_job(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(appointment_id): Path<String>,
    Json(payload): Json<RateJobRequest>,
) -> Result<impl IntoResponse, AppError> {
    perform(&state, &appointment_id, &auth, Command::Rate {
        score: payload.score,
        comment: payload.comment,
    }).await
}
