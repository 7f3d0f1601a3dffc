use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use crate::domain::models::schedule::Occurrence;

/// One booked class ("turno") occupying a single (date, hour) slot.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Appointment {
    pub id: String,
    pub student_id: String,
    pub subscription_id: Option<String>,
    pub date: NaiveDate,
    pub hour: String,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    pub fn new(student_id: String, subscription_id: Option<String>, occurrence: &Occurrence) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            student_id,
            subscription_id,
            date: occurrence.date,
            hour: occurrence.hour.clone(),
            created_at: Utc::now(),
        }
    }
}

/// Selection criteria for bulk appointment deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppointmentFilter {
    ById(String),
    /// Same student and hour, on or after `from`.
    SeriesFrom { student_id: String, hour: String, from: NaiveDate },
    BySubscription(String),
    /// Compatibility path for appointments created before subscription linkage.
    StudentInRange { student_id: String, start: NaiveDate, end: NaiveDate },
}

/// Booked count of one slot.
#[derive(Debug, Serialize, FromRow, Clone, PartialEq, Eq)]
pub struct SlotCount {
    pub date: NaiveDate,
    pub hour: String,
    pub booked: i64,
}
