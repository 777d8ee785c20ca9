use axum::{
    extract::{FromRequestParts, FromRef},
    http::request::Parts,
};
use crate::state::AppState;
use crate::error::AppError;
use std::sync::Arc;
use tracing::{debug, Span};
use super::auth::{bearer_token, AuthUser};

/// Like `AuthUser`, but a missing or invalid token means "guest".
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(access_token) = bearer_token(parts) else {
            return Ok(MaybeAuthUser(None));
        };

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        match app_state.auth_service.verify_access_token(access_token) {
            Ok(claims) => {
                Span::current().record("user_id", claims.sub.as_str());
                Ok(MaybeAuthUser(Some(AuthUser { id: claims.sub, role: claims.role })))
            }
            Err(_) => {
                debug!("MaybeAuth: ignoring invalid access token");
                Ok(MaybeAuthUser(None))
            }
        }
    }
}
