pub mod appointment;
pub mod attendance;
pub mod domain_event;
pub mod plan;
pub mod schedule;
pub mod student;
pub mod subscription;
