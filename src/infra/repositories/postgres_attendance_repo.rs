use crate::domain::{models::attendance::Attendance, ports::AttendanceRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresAttendanceRepo {
    pool: PgPool,
}

impl PostgresAttendanceRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl AttendanceRepository for PostgresAttendanceRepo {
    async fn record(&self, attendance: &Attendance) -> Result<Attendance, AppError> {
        sqlx::query_as::<_, Attendance>("INSERT INTO attendances (id, student_id, checked_in_at) VALUES ($1, $2, $3) RETURNING *")
            .bind(&attendance.id)
            .bind(&attendance.student_id)
            .bind(attendance.checked_in_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_student(&self, student_id: &str) -> Result<Vec<Attendance>, AppError> {
        sqlx::query_as::<_, Attendance>("SELECT * FROM attendances WHERE student_id = $1 ORDER BY checked_in_at DESC")
            .bind(student_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
