use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use super::time_range::TimeRange;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct AvailabilityBlock {
    pub id: String,
    pub provider_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_blockout: bool,
    pub created_at: DateTime<Utc>,
}

impl AvailabilityBlock {
    pub fn new(provider_id: String, range: TimeRange, is_blockout: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            provider_id,
            start_time: range.start,
            end_time: range.end,
            is_blockout,
            created_at: Utc::now(),
        }
    }

    pub fn range(&self) -> TimeRange {
        TimeRange { start: self.start_time, end: self.end_time }
    }
}
