pub mod sqlite_student_repo;
pub mod sqlite_plan_repo;
pub mod sqlite_subscription_repo;
pub mod sqlite_appointment_repo;
pub mod sqlite_attendance_repo;

pub mod postgres_student_repo;
pub mod postgres_plan_repo;
pub mod postgres_subscription_repo;
pub mod postgres_appointment_repo;
pub mod postgres_attendance_repo;
