use crate::domain::{
    models::appointment::{Appointment, AppointmentStatus},
    ports::AppointmentRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteAppointmentRepo {
    pool: SqlitePool,
}

impl SqliteAppointmentRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentRepository for SqliteAppointmentRepo {
    async fn create_if_free(&self, appointment: &Appointment) -> Result<Option<Appointment>, AppError> {
        // Single statement: SQLite serialises writers, so the NOT EXISTS
        // guards and the insert observe the same snapshot.
        sqlx::query_as::<_, Appointment>(
            "INSERT INTO appointments (id, client_id, provider_id, start_time, end_time, duration_minutes, notes, status, created_at)
             SELECT ?, ?, ?, ?, ?, ?, ?, ?, ?
             WHERE NOT EXISTS (
                 SELECT 1 FROM appointments
                 WHERE provider_id = ? AND status IN ('pending', 'accepted')
                   AND start_time < ? AND end_time > ?
             )
             AND NOT EXISTS (
                 SELECT 1 FROM availability_blocks
                 WHERE provider_id = ? AND is_blockout = TRUE
                   AND start_time < ? AND end_time > ?
             )
             RETURNING *"
        )
            .bind(&appointment.id)
            .bind(&appointment.client_id)
            .bind(&appointment.provider_id)
            .bind(appointment.start_time)
            .bind(appointment.end_time)
            .bind(appointment.duration_minutes)
            .bind(&appointment.notes)
            .bind(appointment.status.as_str())
            .bind(appointment.created_at)
            .bind(&appointment.provider_id)
            .bind(appointment.end_time)
            .bind(appointment.start_time)
            .bind(&appointment.provider_id)
            .bind(appointment.end_time)
            .bind(appointment.start_time)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE client_id = ? OR provider_id = ? ORDER BY start_time DESC, id"
        )
            .bind(user_id)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_provider_range(&self, provider_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments
             WHERE provider_id = ? AND start_time < ? AND end_time > ?
             ORDER BY start_time ASC, id"
        )
            .bind(provider_id)
            .bind(end)
            .bind(start)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_status(&self, id: &str, from: AppointmentStatus, to: AppointmentStatus) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE appointments SET status = ? WHERE id = ? AND status = ?")
            .bind(to.as_str())
            .bind(id)
            .bind(from.as_str())
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected() == 1)
    }
}
