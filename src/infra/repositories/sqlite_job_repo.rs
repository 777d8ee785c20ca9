use crate::domain::{models::job::{Job, JobStatus}, ports::JobRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteJobRepo {
    pool: SqlitePool,
}

impl SqliteJobRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobRepository for SqliteJobRepo {
    async fn create(&self, job: &Job) -> Result<Job, AppError> {
        sqlx::query_as::<_, Job>(
            "INSERT INTO jobs (id, appointment_id, description, terms, agreed_price, status, rating, rating_comment, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&job.id)
            .bind(&job.appointment_id)
            .bind(&job.description)
            .bind(&job.terms)
            .bind(job.agreed_price)
            .bind(job.status.as_str())
            .bind(job.rating)
            .bind(&job.rating_comment)
            .bind(job.created_at)
            .bind(job.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_appointment(&self, appointment_id: &str) -> Result<Option<Job>, AppError> {
        sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE appointment_id = ?")
            .bind(appointment_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Job>, AppError> {
        sqlx::query_as::<_, Job>(
            "SELECT j.* FROM jobs j
             JOIN appointments a ON a.id = j.appointment_id
             WHERE a.client_id = ? OR a.provider_id = ?"
        )
            .bind(user_id)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, job: &Job, expected: JobStatus) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE jobs SET status = ?, rating = ?, rating_comment = ?, updated_at = ?
             WHERE id = ? AND status = ?"
        )
            .bind(job.status.as_str())
            .bind(job.rating)
            .bind(&job.rating_comment)
            .bind(job.updated_at)
            .bind(&job.id)
            .bind(expected.as_str())
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected() == 1)
    }
}
