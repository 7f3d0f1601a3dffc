use std::sync::Arc;
use serde::Serialize;
use tracing::{error, info};
use crate::domain::{
    models::{appointment::AppointmentFilter, domain_event::DomainEvent},
    ports::{AppointmentRepository, EventSink, SubscriptionRepository},
};
use crate::error::AppError;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct SubscriptionDeletion {
    pub subscription_id: String,
    pub appointments_deleted: u64,
    /// Set when appointment cleanup failed; the subscription is deleted regardless.
    pub cascade_error: Option<String>,
}

pub struct LifecycleManager {
    appointments: Arc<dyn AppointmentRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    events: Arc<dyn EventSink>,
}

impl LifecycleManager {
    pub fn new(
        appointments: Arc<dyn AppointmentRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self { appointments, subscriptions, events }
    }

    /// Deletes one appointment, or with `cascade` also every later one of the
    /// same student at the same hour.
    pub async fn delete_appointment(&self, appointment_id: &str, cascade: bool) -> Result<u64, AppError> {
        let appointment = self.appointments.find_by_id(appointment_id).await?
            .ok_or(AppError::NotFound("Appointment not found".into()))?;

        let filter = if cascade {
            AppointmentFilter::SeriesFrom {
                student_id: appointment.student_id.clone(),
                hour: appointment.hour.clone(),
                from: appointment.date,
            }
        } else {
            AppointmentFilter::ById(appointment.id.clone())
        };

        let deleted = self.appointments.delete(&filter).await?;
        info!(appointment_id, cascade, deleted, "Appointments deleted");

        if deleted > 0 {
            self.events.publish(DomainEvent::AppointmentsChanged {
                student_id: appointment.student_id,
                created: 0,
                deleted,
            });
        }
        Ok(deleted)
    }

    pub async fn delete_subscription(&self, subscription_id: &str) -> Result<SubscriptionDeletion, AppError> {
        let subscription = self.subscriptions.find_by_id(subscription_id).await?
            .ok_or(AppError::NotFound("Subscription not found".into()))?;

        self.subscriptions.delete(subscription_id).await?;
        info!(subscription_id, "Subscription deleted");

        let mut deleted = 0;
        let mut failures = Vec::new();

        match self.appointments.delete(&AppointmentFilter::BySubscription(subscription.id.clone())).await {
            Ok(n) => deleted += n,
            Err(e) => {
                error!(subscription_id, "Failed to delete linked appointments: {}", e);
                failures.push(e.to_string());
            }
        }

        let unlinked = AppointmentFilter::StudentInRange {
            student_id: subscription.student_id.clone(),
            start: subscription.start_date,
            end: subscription.end_date,
        };
        match self.appointments.delete(&unlinked).await {
            Ok(n) => deleted += n,
            Err(e) => {
                error!(subscription_id, "Failed to delete unlinked appointments in range: {}", e);
                failures.push(e.to_string());
            }
        }

        self.events.publish(DomainEvent::SubscriptionDeleted {
            subscription_id: subscription.id.clone(),
        });
        if deleted > 0 {
            self.events.publish(DomainEvent::AppointmentsChanged {
                student_id: subscription.student_id,
                created: 0,
                deleted,
            });
        }

        Ok(SubscriptionDeletion {
            subscription_id: subscription.id,
            appointments_deleted: deleted,
            cascade_error: (!failures.is_empty()).then(|| failures.join("; ")),
        })
    }
}
