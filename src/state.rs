use std::sync::Arc;
use crate::config::Config;
use crate::domain::models::schedule::SchedulingRules;
use crate::domain::ports::{
    AppointmentRepository, AttendanceRepository, PlanRepository, StudentRepository,
    SubscriptionRepository,
};
use crate::domain::services::{
    allocator::CapacityAllocator, attendance::AttendanceService, lifecycle::LifecycleManager,
    scheduling::RecurringScheduler, subscription_binder::SubscriptionBinder,
};
use crate::infra::events::broadcast_sink::BroadcastEventSink;

pub struct Repositories {
    pub students: Arc<dyn StudentRepository>,
    pub plans: Arc<dyn PlanRepository>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
    pub appointments: Arc<dyn AppointmentRepository>,
    pub attendances: Arc<dyn AttendanceRepository>,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub rules: SchedulingRules,
    pub student_repo: Arc<dyn StudentRepository>,
    pub plan_repo: Arc<dyn PlanRepository>,
    pub subscription_repo: Arc<dyn SubscriptionRepository>,
    pub appointment_repo: Arc<dyn AppointmentRepository>,
    pub attendance_repo: Arc<dyn AttendanceRepository>,
    pub events: Arc<BroadcastEventSink>,
    pub allocator: Arc<CapacityAllocator>,
    pub binder: Arc<SubscriptionBinder>,
    pub lifecycle: Arc<LifecycleManager>,
    pub scheduler: Arc<RecurringScheduler>,
    pub attendance_service: Arc<AttendanceService>,
}

impl AppState {
    /// Wires the services on top of whichever storage backend was chosen.
    pub fn new(config: Config, repos: Repositories, events: Arc<BroadcastEventSink>) -> Self {
        let rules = config.rules();

        let allocator = Arc::new(CapacityAllocator::new(
            repos.appointments.clone(),
            events.clone(),
            rules.slot_capacity,
        ));
        let binder = Arc::new(SubscriptionBinder::new(repos.subscriptions.clone()));
        let lifecycle = Arc::new(LifecycleManager::new(
            repos.appointments.clone(),
            repos.subscriptions.clone(),
            events.clone(),
        ));
        let scheduler = Arc::new(RecurringScheduler::new(
            repos.students.clone(),
            binder.clone(),
            allocator.clone(),
            rules.clone(),
        ));
        let attendance_service = Arc::new(AttendanceService::new(
            repos.students.clone(),
            repos.subscriptions.clone(),
            repos.appointments.clone(),
            repos.attendances.clone(),
        ));

        Self {
            config,
            rules,
            student_repo: repos.students,
            plan_repo: repos.plans,
            subscription_repo: repos.subscriptions,
            appointment_repo: repos.appointments,
            attendance_repo: repos.attendances,
            events,
            allocator,
            binder,
            lifecycle,
            scheduler,
            attendance_service,
        }
    }
}
