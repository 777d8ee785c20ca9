use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use super::appointment::UnknownStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Client,
    Provider,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Client => "client",
            UserRole::Provider => "provider",
        }
    }
}

impl TryFrom<String> for UserRole {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "client" => Ok(UserRole::Client),
            "provider" => Ok(UserRole::Provider),
            _ => Err(UnknownStatus(value)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub rut: String,
    pub birth_date: NaiveDate,
    pub phone: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

pub struct NewUserParams {
    pub email: String,
    pub display_name: String,
    pub rut: String,
    pub birth_date: NaiveDate,
    pub phone: Option<String>,
    pub password_hash: String,
    pub role: UserRole,
}

impl User {
    pub fn new(params: NewUserParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: params.email.trim().to_lowercase(),
            display_name: params.display_name,
            rut: params.rut,
            birth_date: params.birth_date,
            phone: params.phone,
            password_hash: params.password_hash,
            role: params.role,
            created_at: Utc::now(),
        }
    }
}
