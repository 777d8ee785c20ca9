use axum::{extract::State, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::requests::{LoginRequest, RefreshRequest, RegisterRequest, UpdateProfileRequest};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::auth::{AuthResponse, UserProfile};
use crate::domain::models::user::{NewUserParams, User};
use crate::domain::services::{auth_service::TokenPair, registration::{self, RegistrationInput}};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

fn auth_response(tokens: TokenPair, user: &User) -> AuthResponse {
    AuthResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        token_type: "Bearer".to_string(),
        user: UserProfile::from(user),
    }
}

fn clean_phone(phone: Option<String>) -> Option<String> {
    phone.map(|p| p.trim().to_string()).filter(|p| !p.is_empty())
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let today = Utc::now().with_timezone(&state.config.default_timezone).date_naive();
    let valid = registration::validate(&RegistrationInput {
        email: &payload.email,
        password: &payload.password,
        display_name: &payload.display_name,
        rut: &payload.rut,
        birth_date: payload.birth_date,
    }, today)?;

    let password_hash = state.auth_service.hash_password(&payload.password)?;
    let user = state.user_repo.create(&User::new(NewUserParams {
        email: valid.email,
        display_name: valid.display_name,
        rut: valid.rut,
        birth_date: payload.birth_date,
        phone: clean_phone(payload.phone),
        password_hash,
        role: payload.role,
    })).await?;

    let tokens = state.auth_service.login(&user).await?;
    info!(user_id = %user.id, role = user.role.as_str(), "User registered");

    Ok((StatusCode::CREATED, Json(auth_response(tokens, &user))))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = payload.email.trim().to_lowercase();
    let user = state.user_repo.find_by_email(&email).await?
        .ok_or(AppError::Unauthorized)?;

    state.auth_service.verify_password(&payload.password, &user.password_hash)?;
    let tokens = state.auth_service.login(&user).await?;

    info!("User logged in: {}", user.id);
    Ok(Json(auth_response(tokens, &user)))
}

pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RefreshRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = state.auth_service.find_refresh_owner(&payload.refresh_token).await?;
    let user = state.user_repo.find_by_id(&user_id).await?
        .ok_or(AppError::Unauthorized)?;

    let tokens = state.auth_service.refresh(&payload.refresh_token, &user).await?;

    info!("Token refreshed for user: {}", user.id);
    Ok(Json(auth_response(tokens, &user)))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RefreshRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.auth_service.logout(&payload.refresh_token).await?;
    info!("User logged out");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn me(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_repo.find_by_id(&auth.id).await?
        .ok_or(AppError::NotFound("User not found".into()))?;
    Ok(Json(UserProfile::from(&user)))
}

pub async fn update_me(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut user = state.user_repo.find_by_id(&auth.id).await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    if let Some(name) = payload.display_name {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Display name is required".into()));
        }
        user.display_name = name.to_string();
    }
    if payload.phone.is_some() {
        user.phone = clean_phone(payload.phone);
    }

    let updated = state.user_repo.update_profile(&user).await?;
    info!(user_id = %updated.id, "Profile updated");
    Ok(Json(UserProfile::from(&updated)))
}
