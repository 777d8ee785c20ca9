use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use thiserror::Error;
use super::time_range::TimeRange;

#[derive(Error, Debug)]
#[error("Unknown status value: {0}")]
pub struct UnknownStatus(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Accepted,
    Rejected,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Accepted => "accepted",
            AppointmentStatus::Rejected => "rejected",
        }
    }

    pub fn is_blocking(&self) -> bool {
        matches!(self, AppointmentStatus::Pending | AppointmentStatus::Accepted)
    }
}

impl TryFrom<String> for AppointmentStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(AppointmentStatus::Pending),
            "accepted" => Ok(AppointmentStatus::Accepted),
            "rejected" => Ok(AppointmentStatus::Rejected),
            _ => Err(UnknownStatus(value)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Appointment {
    pub id: String,
    pub client_id: String,
    pub provider_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub notes: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

pub struct NewAppointmentParams {
    pub client_id: String,
    pub provider_id: String,
    pub range: TimeRange,
    pub notes: Option<String>,
}

impl Appointment {
    pub fn new(params: NewAppointmentParams) -> Self {
        let notes = params.notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        Self {
            id: Uuid::new_v4().to_string(),
            client_id: params.client_id,
            provider_id: params.provider_id,
            start_time: params.range.start,
            end_time: params.range.end,
            duration_minutes: params.range.duration_minutes() as i32,
            notes,
            status: AppointmentStatus::Pending,
            created_at: Utc::now(),
        }
    }

    pub fn range(&self) -> TimeRange {
        TimeRange { start: self.start_time, end: self.end_time }
    }
}
