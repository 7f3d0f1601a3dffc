use crate::domain::{models::attendance::Attendance, ports::AttendanceRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteAttendanceRepo {
    pool: SqlitePool,
}

impl SqliteAttendanceRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl AttendanceRepository for SqliteAttendanceRepo {
    async fn record(&self, attendance: &Attendance) -> Result<Attendance, AppError> {
        sqlx::query_as::<_, Attendance>("INSERT INTO attendances (id, student_id, checked_in_at) VALUES (?, ?, ?) RETURNING *")
            .bind(&attendance.id)
            .bind(&attendance.student_id)
            .bind(attendance.checked_in_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_student(&self, student_id: &str) -> Result<Vec<Attendance>, AppError> {
        sqlx::query_as::<_, Attendance>("SELECT * FROM attendances WHERE student_id = ? ORDER BY checked_in_at DESC")
            .bind(student_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
