use crate::domain::{models::availability::AvailabilityBlock, ports::AvailabilityRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresAvailabilityRepo {
    pool: PgPool,
}

impl PostgresAvailabilityRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AvailabilityRepository for PostgresAvailabilityRepo {
    async fn create(&self, block: &AvailabilityBlock) -> Result<AvailabilityBlock, AppError> {
        sqlx::query_as::<_, AvailabilityBlock>(
            "INSERT INTO availability_blocks (id, provider_id, start_time, end_time, is_blockout, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *"
        )
            .bind(&block.id)
            .bind(&block.provider_id)
            .bind(block.start_time)
            .bind(block.end_time)
            .bind(block.is_blockout)
            .bind(block.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<AvailabilityBlock>, AppError> {
        sqlx::query_as::<_, AvailabilityBlock>("SELECT * FROM availability_blocks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_provider(&self, provider_id: &str) -> Result<Vec<AvailabilityBlock>, AppError> {
        sqlx::query_as::<_, AvailabilityBlock>(
            "SELECT * FROM availability_blocks WHERE provider_id = $1 ORDER BY start_time ASC, id"
        )
            .bind(provider_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_range(&self, provider_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<AvailabilityBlock>, AppError> {
        sqlx::query_as::<_, AvailabilityBlock>(
            "SELECT * FROM availability_blocks
             WHERE provider_id = $1 AND start_time < $2 AND end_time > $3
             ORDER BY start_time ASC, id"
        )
            .bind(provider_id)
            .bind(end)
            .bind(start)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, provider_id: &str, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM availability_blocks WHERE id = $1 AND provider_id = $2")
            .bind(id)
            .bind(provider_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Availability block not found".into()));
        }
        Ok(())
    }
}
