use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Attendance {
    pub id: String,
    pub student_id: String,
    pub checked_in_at: DateTime<Utc>,
}

impl Attendance {
    pub fn new(student_id: String, checked_in_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            student_id,
            checked_in_at,
        }
    }
}
