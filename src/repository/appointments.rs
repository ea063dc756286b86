use chrono::{DateTime, Utc};

use super::models::{Appointment, AppointmentDetail, AppointmentWithProvider};
use super::postgres_repository::PostgresRepository;
use crate::dates::CANCELLATION_WINDOW_HOURS;
use crate::errors::CustomError;

pub const PAGE_SIZE: i64 = 20;

#[async_trait::async_trait]
pub trait AppointmentRepository {
    /// Non-canceled appointments owned by `user_id`, oldest first, joined
    /// with the provider and the provider's avatar. Offset pagination, no
    /// total count.
    async fn list_for_user(
        &self,
        user_id: i32,
        page: i64,
    ) -> Result<Vec<AppointmentWithProvider>, CustomError>;

    /// Inserts the appointment with the raw date the client sent. Slot
    /// uniqueness is enforced by the storage layer for non-canceled rows,
    /// so two concurrent bookings for the same slot cannot both land: the
    /// loser gets the conflict error.
    async fn create_appointment(
        &self,
        user_id: i32,
        provider_id: i32,
        date: DateTime<Utc>,
    ) -> Result<Appointment, CustomError>;

    async fn get_appointment_detail(
        &self,
        id: i32,
    ) -> Result<Option<AppointmentDetail>, CustomError>;

    /// Conditional cancellation. The not-yet-canceled and window checks are
    /// re-applied atomically with the write, so a concurrent cancel (or a
    /// slot sliding into the window between read and write) yields `None`
    /// instead of clearing an already-set canceled_at.
    async fn cancel_appointment(&self, id: i32) -> Result<Option<Appointment>, CustomError>;
}

#[async_trait::async_trait]
impl AppointmentRepository for PostgresRepository {
    async fn list_for_user(
        &self,
        user_id: i32,
        page: i64,
    ) -> Result<Vec<AppointmentWithProvider>, CustomError> {
        let offset = (page - 1) * PAGE_SIZE;
        let appointments = sqlx::query_as::<_, AppointmentWithProvider>(
            r#"
            SELECT a.id, a.date, a.canceled_at,
                   p.id AS provider_id, p.name AS provider_name,
                   f.id AS avatar_id, f.path AS avatar_path
            FROM appointments a
            JOIN users p ON p.id = a.provider_id
            LEFT JOIN files f ON f.id = p.avatar_id
            WHERE a.user_id = $1 AND a.canceled_at IS NULL
            ORDER BY a.date ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(PAGE_SIZE)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(appointments)
    }

    async fn create_appointment(
        &self,
        user_id: i32,
        provider_id: i32,
        date: DateTime<Utc>,
    ) -> Result<Appointment, CustomError> {
        // The partial unique index on (provider_id, date_trunc('hour', date))
        // turns a lost race into a unique violation, mapped here.
        let query_result = sqlx::query_as::<_, Appointment>(
            r#"
            INSERT INTO appointments (user_id, provider_id, date)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(provider_id)
        .bind(date)
        .fetch_one(&self.pool)
        .await;

        match query_result {
            Ok(appointment) => Ok(appointment),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(CustomError::Conflict {
                    message: "Sem vagas para essa data, marque outra".to_string(),
                })
            }
            Err(e) => {
                log::error!("Error creating appointment: {:?}", e);
                Err(CustomError::InternalError)
            }
        }
    }

    async fn get_appointment_detail(
        &self,
        id: i32,
    ) -> Result<Option<AppointmentDetail>, CustomError> {
        let appointment = sqlx::query_as::<_, AppointmentDetail>(
            r#"
            SELECT a.id, a.user_id, a.date, a.canceled_at,
                   p.name AS provider_name, p.email AS provider_email,
                   u.name AS user_name
            FROM appointments a
            JOIN users p ON p.id = a.provider_id
            JOIN users u ON u.id = a.user_id
            WHERE a.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(appointment)
    }

    async fn cancel_appointment(&self, id: i32) -> Result<Option<Appointment>, CustomError> {
        let appointment = sqlx::query_as::<_, Appointment>(
            r#"
            UPDATE appointments
            SET canceled_at = NOW(), updated_at = NOW()
            WHERE id = $1
              AND canceled_at IS NULL
              AND date >= NOW() + make_interval(hours => $2::int)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(CANCELLATION_WINDOW_HOURS as i32)
        .fetch_optional(&self.pool)
        .await?;

        Ok(appointment)
    }
}
