use axum::{extract::{State, Path}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::CreateAvailabilityRequest;
use crate::domain::models::{time_range::TimeRange, user::UserRole};
use crate::error::AppError;
use chrono::Utc;
use std::sync::Arc;

pub async fn list_blocks(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    if auth.role != UserRole::Provider {
        return Err(AppError::Forbidden("Only providers have availability".into()));
    }
    Ok(Json(state.availability_editor.list(&auth.id).await?))
}

pub async fn create_block(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(payload): Json<CreateAvailabilityRequest>,
) -> Result<impl IntoResponse, AppError> {
    let range = TimeRange::new(payload.start_time, payload.end_time)?;
    let blocks = state.availability_editor
        .create_block(&auth.id, auth.role, range, payload.is_blockout, Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(blocks)))
}

pub async fn delete_block(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(block_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if auth.role != UserRole::Provider {
        return Err(AppError::Forbidden("Only providers can edit availability".into()));
    }
    Ok(Json(state.availability_editor.delete_block(&auth.id, &block_id).await?))
}
