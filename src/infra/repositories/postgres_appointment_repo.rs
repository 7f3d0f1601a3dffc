use crate::domain::{
    models::appointment::{Appointment, AppointmentFilter, SlotCount},
    ports::AppointmentRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool, Row};

pub struct PostgresAppointmentRepo {
    pool: PgPool,
}

impl PostgresAppointmentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Serialises writers of one (date, hour) slot for the rest of the transaction,
/// then inserts only while the slot is below `capacity`.
async fn insert_if_room(conn: &mut PgConnection, appointment: &Appointment, capacity: i64) -> Result<Appointment, AppError> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
        .bind(format!("appointments:{}:{}", appointment.date, appointment.hour))
        .execute(&mut *conn)
        .await
        .map_err(AppError::Database)?;

    sqlx::query_as::<_, Appointment>(
        r#"INSERT INTO appointments (id, student_id, subscription_id, date, hour, created_at)
           SELECT $1, $2, $3, $4, $5, $6
           WHERE (SELECT COUNT(*) FROM appointments WHERE date = $4 AND hour = $5) < $7
           RETURNING *"#
    )
        .bind(&appointment.id)
        .bind(&appointment.student_id)
        .bind(&appointment.subscription_id)
        .bind(appointment.date)
        .bind(&appointment.hour)
        .bind(appointment.created_at)
        .bind(capacity)
        .fetch_optional(&mut *conn)
        .await
        .map_err(AppError::Database)?
        .ok_or(AppError::SlotFull { date: appointment.date, hour: appointment.hour.clone() })
}

#[async_trait]
impl AppointmentRepository for PostgresAppointmentRepo {
    async fn count_bookings(&self, date: NaiveDate, hour: &str) -> Result<i64, AppError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM appointments WHERE date = $1 AND hour = $2")
            .bind(date)
            .bind(hour)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.get::<i64, _>("count"))
    }

    async fn insert_batch(&self, appointments: &[Appointment], capacity: i64) -> Result<Vec<Appointment>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let mut inserted = Vec::with_capacity(appointments.len());
        for appointment in appointments {
            inserted.push(insert_if_room(&mut *tx, appointment, capacity).await?);
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(inserted)
    }

    async fn insert_one(&self, appointment: &Appointment, capacity: i64) -> Result<Appointment, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let inserted = insert_if_room(&mut *tx, appointment, capacity).await?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(inserted)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE date >= $1 AND date <= $2 ORDER BY date ASC, hour ASC"
        )
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_for_student(&self, student_id: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE student_id = $1 AND date >= $2 AND date <= $3 ORDER BY date ASC, hour ASC"
        )
            .bind(student_id)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_by_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<SlotCount>, AppError> {
        sqlx::query_as::<_, SlotCount>(
            r#"SELECT date, hour, COUNT(*) AS booked FROM appointments
               WHERE date >= $1 AND date <= $2
               GROUP BY date, hour
               ORDER BY date, hour"#
        )
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, filter: &AppointmentFilter) -> Result<u64, AppError> {
        let result = match filter {
            AppointmentFilter::ById(id) => {
                sqlx::query("DELETE FROM appointments WHERE id = $1")
                    .bind(id)
                    .execute(&self.pool)
                    .await
            }
            AppointmentFilter::SeriesFrom { student_id, hour, from } => {
                sqlx::query("DELETE FROM appointments WHERE student_id = $1 AND hour = $2 AND date >= $3")
                    .bind(student_id)
                    .bind(hour)
                    .bind(from)
                    .execute(&self.pool)
                    .await
            }
            AppointmentFilter::BySubscription(subscription_id) => {
                sqlx::query("DELETE FROM appointments WHERE subscription_id = $1")
                    .bind(subscription_id)
                    .execute(&self.pool)
                    .await
            }
            AppointmentFilter::StudentInRange { student_id, start, end } => {
                sqlx::query(
                    "DELETE FROM appointments WHERE student_id = $1 AND subscription_id IS NULL AND date >= $2 AND date <= $3"
                )
                    .bind(student_id)
                    .bind(start)
                    .bind(end)
                    .execute(&self.pool)
                    .await
            }
        }.map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }
}
