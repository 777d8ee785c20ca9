use thiserror::Error;
use crate::domain::models::time_range::RangeError;
use crate::domain::services::{lifecycle::LifecycleError, overlap::SlotRejection};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Not logged in")]
    NotLoggedIn,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Server returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Session storage error: {0}")]
    Storage(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Unauthorized => Some(401),
            _ => None,
        }
    }
}

impl From<SlotRejection> for ClientError {
    fn from(e: SlotRejection) -> Self {
        ClientError::Validation(e.to_string())
    }
}

impl From<LifecycleError> for ClientError {
    fn from(e: LifecycleError) -> Self {
        ClientError::Validation(e.to_string())
    }
}

impl From<RangeError> for ClientError {
    fn from(e: RangeError) -> Self {
        ClientError::Validation(e.to_string())
    }
}
