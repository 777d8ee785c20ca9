use crate::domain::{models::job::{Job, JobStatus}, ports::JobRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresJobRepo {
    pool: PgPool,
}

impl PostgresJobRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobRepository for PostgresJobRepo {
    async fn create(&self, job: &Job) -> Result<Job, AppError> {
        sqlx::query_as::<_, Job>(
            "INSERT INTO jobs (id, appointment_id, description, terms, agreed_price, status, rating, rating_comment, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *"
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
        sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE appointment_id = $1")
            .bind(appointment_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Job>, AppError> {
        sqlx::query_as::<_, Job>(
            "SELECT j.* FROM jobs j
             JOIN appointments a ON a.id = j.appointment_id
             WHERE a.client_id = $1 OR a.provider_id = $1"
        )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, job: &Job, expected: JobStatus) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE jobs SET status = $1, rating = $2, rating_comment = $3, updated_at = $4
             WHERE id = $5 AND status = $6"
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
