use crate::domain::models::user::UserRole;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub rut: String,
    pub birth_date: NaiveDate,
    pub phone: Option<String>,
    pub role: UserRole,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateAvailabilityRequest {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub is_blockout: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CalendarQuery {
    pub date: Option<NaiveDate>,
    pub tz: Option<String>,
    pub days: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub provider_id: String,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProposeJobRequest {
    pub description: String,
    pub terms: Option<String>,
    pub agreed_price: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RateJobRequest {
    pub score: i32,
    pub comment: Option<String>,
}
