use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::maybe_auth::MaybeAuthUser;
use crate::api::dtos::{requests::CalendarQuery, responses::CalendarResponse};
use crate::domain::services::booking_selector::calendar_window;
use crate::error::AppError;
use chrono::Utc;
use chrono_tz::Tz;
use std::sync::Arc;

pub const DEFAULT_WINDOW_DAYS: u32 = 7;

pub async fn get_calendar(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Path(provider_id): Path<String>,
    Query(query): Query<CalendarQuery>,
) -> Result<impl IntoResponse, AppError> {
    let tz: Tz = match query.tz.as_deref() {
        Some(name) => name.parse()
            .map_err(|_| AppError::Validation(format!("Unknown timezone '{}'", name)))?,
        None => state.config.default_timezone,
    };
    let date = query.date.unwrap_or_else(|| Utc::now().with_timezone(&tz).date_naive());
    let window = calendar_window(date, tz, query.days.unwrap_or(DEFAULT_WINDOW_DAYS))?;

    let viewer_id = viewer.as_ref().map(|v| v.id.as_str());
    let events = state.booking_selector.calendar(&provider_id, window, viewer_id).await?;

    Ok(Json(CalendarResponse {
        provider_id,
        timezone: tz.name().to_string(),
        window_start: window.start,
        window_end: window.end,
        events,
    }))
}
