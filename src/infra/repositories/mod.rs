pub mod sqlite_user_repo;
pub mod sqlite_auth_repo;
pub mod sqlite_availability_repo;
pub mod sqlite_appointment_repo;
pub mod sqlite_job_repo;

pub mod postgres_user_repo;
pub mod postgres_auth_repo;
pub mod postgres_availability_repo;
pub mod postgres_appointment_repo;
pub mod postgres_job_repo;
