use crate::domain::models::{
    appointment::{Appointment, AppointmentStatus},
    auth::RefreshTokenRecord,
    availability::AvailabilityBlock,
    job::{Job, JobStatus},
    user::User,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn update_profile(&self, user: &User) -> Result<User, AppError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;
    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError>;
    async fn delete_refresh_token(&self, token_hash: &str) -> Result<(), AppError>;
    async fn delete_refresh_family(&self, family_id: Uuid) -> Result<(), AppError>;
}

#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    async fn create(&self, block: &AvailabilityBlock) -> Result<AvailabilityBlock, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<AvailabilityBlock>, AppError>;
    async fn list_by_provider(&self, provider_id: &str) -> Result<Vec<AvailabilityBlock>, AppError>;
    async fn list_by_range(&self, provider_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<AvailabilityBlock>, AppError>;
    async fn delete(&self, provider_id: &str, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// `None` when a blocking entry of the same provider already overlaps.
    async fn create_if_free(&self, appointment: &Appointment) -> Result<Option<Appointment>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Appointment>, AppError>;
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Appointment>, AppError>;
    async fn list_by_provider_range(&self, provider_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Appointment>, AppError>;
    async fn update_status(&self, id: &str, from: AppointmentStatus, to: AppointmentStatus) -> Result<bool, AppError>;
}

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create(&self, job: &Job) -> Result<Job, AppError>;
    async fn find_by_appointment(&self, appointment_id: &str) -> Result<Option<Job>, AppError>;
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Job>, AppError>;
    async fn update(&self, job: &Job, expected: JobStatus) -> Result<bool, AppError>;
}
