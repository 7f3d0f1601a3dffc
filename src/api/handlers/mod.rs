pub mod appointment;
pub mod attendance;
pub mod health;
pub mod occupancy;
pub mod plan;
pub mod student;
pub mod subscription;
