use std::env;
use chrono_tz::Tz;
use crate::error::AppError;

pub const DEFAULT_DURATION_MIN: i32 = 60;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub auth_issuer: String,
    pub default_timezone: Tz,
    pub default_duration_min: i32,
    pub log_dir: String,
}

fn required(key: &str) -> Result<String, AppError> {
    env::var(key).map_err(|_| AppError::Config(format!("{} must be set", key)))
}

fn parsed<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, AppError> {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| AppError::Config(format!("{} has an invalid value", key)))
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let jwt_secret = required("JWT_SECRET")?;
        if jwt_secret.len() < 32 {
            return Err(AppError::Config("JWT_SECRET must be at least 32 bytes".into()));
        }

        let default_duration_min: i32 = parsed("DEFAULT_DURATION_MIN", "60")?;
        if default_duration_min <= 0 {
            return Err(AppError::Config("DEFAULT_DURATION_MIN must be positive".into()));
        }

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            port: parsed("PORT", "3000")?,
            jwt_secret,
            auth_issuer: env::var("AUTH_ISSUER").unwrap_or_else(|_| "https://api.chambee.local".to_string()),
            default_timezone: parsed("DEFAULT_TIMEZONE", "America/Santiago")?,
            default_duration_min,
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "./logs".to_string()),
        })
    }
}
