pub mod allocator;
pub mod attendance;
pub mod lifecycle;
pub mod occupancy;
pub mod recurrence;
pub mod scheduling;
pub mod subscription_binder;
