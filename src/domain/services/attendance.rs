use std::sync::Arc;
use chrono::{NaiveDateTime, Utc};
use serde::Serialize;
use tracing::info;
use crate::domain::{
    models::{
        appointment::Appointment, attendance::Attendance, schedule::parse_slot_hour,
        student::Student, subscription::Subscription,
    },
    ports::{AppointmentRepository, AttendanceRepository, StudentRepository, SubscriptionRepository},
};
use crate::error::AppError;

#[derive(Debug, Serialize, Clone)]
pub struct CheckIn {
    pub student: Student,
    pub active_subscription: Option<Subscription>,
    pub remaining_appointments: Vec<Appointment>,
    pub attendance: Attendance,
}

/// Front-desk check-in by national id.
pub struct AttendanceService {
    students: Arc<dyn StudentRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    appointments: Arc<dyn AppointmentRepository>,
    attendances: Arc<dyn AttendanceRepository>,
}

impl AttendanceService {
    pub fn new(
        students: Arc<dyn StudentRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        appointments: Arc<dyn AppointmentRepository>,
        attendances: Arc<dyn AttendanceRepository>,
    ) -> Self {
        Self { students, subscriptions, appointments, attendances }
    }

    /// `now` is the studio's local wall-clock time.
    pub async fn check_in(&self, dni: &str, now: NaiveDateTime) -> Result<CheckIn, AppError> {
        let student = self.students.find_by_dni(dni).await?
            .ok_or(AppError::NotFound("No student with that DNI".into()))?;

        let today = now.date();
        let active_subscription = self.subscriptions.find_overlapping(&student.id, today, None).await?;
        let until = active_subscription.as_ref().map(|s| s.end_date).unwrap_or(today);

        let remaining_appointments: Vec<Appointment> = self.appointments
            .list_for_student(&student.id, today, until)
            .await?
            .into_iter()
            .filter(|a| {
                parse_slot_hour(&a.hour)
                    .and_then(|h| a.date.and_hms_opt(h, 0, 0))
                    .is_some_and(|starts_at| starts_at >= now)
            })
            .collect();

        let attendance = self.attendances.record(&Attendance::new(student.id.clone(), Utc::now())).await?;
        info!(student_id = %student.id, remaining = remaining_appointments.len(), "Attendance recorded");

        Ok(CheckIn {
            student,
            active_subscription,
            remaining_appointments,
            attendance,
        })
    }
}
