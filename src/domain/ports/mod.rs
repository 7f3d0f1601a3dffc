use crate::domain::models::{
    student::Student, plan::Plan, subscription::Subscription, attendance::Attendance,
    appointment::{Appointment, AppointmentFilter, SlotCount},
    domain_event::DomainEvent,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait StudentRepository: Send + Sync {
    async fn create(&self, student: &Student) -> Result<Student, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Student>, AppError>;
    async fn find_by_dni(&self, dni: &str) -> Result<Option<Student>, AppError>;
    async fn list(&self) -> Result<Vec<Student>, AppError>;
}

#[async_trait]
pub trait PlanRepository: Send + Sync {
    async fn create(&self, plan: &Plan) -> Result<Plan, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Plan>, AppError>;
    async fn list(&self) -> Result<Vec<Plan>, AppError>;
}

#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn create(&self, subscription: &Subscription) -> Result<Subscription, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Subscription>, AppError>;
    async fn list_by_student(&self, student_id: &str) -> Result<Vec<Subscription>, AppError>;
    async fn update(&self, subscription: &Subscription) -> Result<Subscription, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    /// The student's subscription whose [start, end] contains `as_of`, ignoring `exclude_id`.
    async fn find_overlapping(&self, student_id: &str, as_of: NaiveDate, exclude_id: Option<&str>) -> Result<Option<Subscription>, AppError>;
}

/// Slot storage. Inserts enforce `capacity` themselves and fail with
/// `AppError::SlotFull` instead of exceeding it; a batch is all-or-nothing.
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn count_bookings(&self, date: NaiveDate, hour: &str) -> Result<i64, AppError>;
    async fn insert_batch(&self, appointments: &[Appointment], capacity: i64) -> Result<Vec<Appointment>, AppError>;
    async fn insert_one(&self, appointment: &Appointment, capacity: i64) -> Result<Appointment, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Appointment>, AppError>;
    async fn list_by_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Appointment>, AppError>;
    async fn list_for_student(&self, student_id: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<Appointment>, AppError>;
    async fn count_by_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<SlotCount>, AppError>;
    async fn delete(&self, filter: &AppointmentFilter) -> Result<u64, AppError>;
}

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    async fn record(&self, attendance: &Attendance) -> Result<Attendance, AppError>;
    async fn list_by_student(&self, student_id: &str) -> Result<Vec<Attendance>, AppError>;
}

/// Fire-and-forget notification channel to presentation layers.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: DomainEvent);
}
