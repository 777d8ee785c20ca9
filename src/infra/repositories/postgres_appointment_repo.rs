use crate::domain::{
    models::appointment::{Appointment, AppointmentStatus},
    ports::AppointmentRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresAppointmentRepo {
    pool: PgPool,
}

impl PostgresAppointmentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentRepository for PostgresAppointmentRepo {
    async fn create_if_free(&self, appointment: &Appointment) -> Result<Option<Appointment>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Serialises bookings per provider until commit; READ COMMITTED alone
        // would let two NOT EXISTS checks pass side by side.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(&appointment.provider_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let created = sqlx::query_as::<_, Appointment>(
            "INSERT INTO appointments (id, client_id, provider_id, start_time, end_time, duration_minutes, notes, status, created_at)
             SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9
             WHERE NOT EXISTS (
                 SELECT 1 FROM appointments
                 WHERE provider_id = $3 AND status IN ('pending', 'accepted')
                   AND start_time < $5 AND end_time > $4
             )
             AND NOT EXISTS (
                 SELECT 1 FROM availability_blocks
                 WHERE provider_id = $3 AND is_blockout = TRUE
                   AND start_time < $5 AND end_time > $4
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
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE client_id = $1 OR provider_id = $1 ORDER BY start_time DESC, id"
        )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_provider_range(&self, provider_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments
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

    async fn update_status(&self, id: &str, from: AppointmentStatus, to: AppointmentStatus) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE appointments SET status = $1 WHERE id = $2 AND status = $3")
            .bind(to.as_str())
            .bind(id)
            .bind(from.as_str())
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected() == 1)
    }
}
