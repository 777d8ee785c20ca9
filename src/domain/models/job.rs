use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;
use super::appointment::UnknownStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Proposed,
    Accepted,
    Finalized,
    Confirmed,
    Rated,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Proposed => "proposed",
            JobStatus::Accepted => "accepted",
            JobStatus::Finalized => "finalized",
            JobStatus::Confirmed => "confirmed",
            JobStatus::Rated => "rated",
        }
    }
}

impl TryFrom<String> for JobStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "proposed" => Ok(JobStatus::Proposed),
            "accepted" => Ok(JobStatus::Accepted),
            "finalized" => Ok(JobStatus::Finalized),
            "confirmed" => Ok(JobStatus::Confirmed),
            "rated" => Ok(JobStatus::Rated),
            _ => Err(UnknownStatus(value)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Job {
    pub id: String,
    pub appointment_id: String,
    pub description: String,
    pub terms: Option<String>,
    /// Whole pesos.
    pub agreed_price: i64,
    #[sqlx(try_from = "String")]
    pub status: JobStatus,
    pub rating: Option<i32>,
    pub rating_comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn propose(appointment_id: String, description: String, terms: Option<String>, agreed_price: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            appointment_id,
            description,
            terms,
            agreed_price,
            status: JobStatus::Proposed,
            rating: None,
            rating_comment: None,
            created_at: now,
            updated_at: now,
        }
    }
}
