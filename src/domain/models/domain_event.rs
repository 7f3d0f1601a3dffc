use serde::Serialize;

/// Notifications published to presentation layers after state changes.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    AppointmentsChanged {
        student_id: String,
        created: usize,
        deleted: u64,
    },
    SubscriptionDeleted {
        subscription_id: String,
    },
}
