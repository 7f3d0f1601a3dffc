use std::sync::Arc;
use tracing::{error, info, warn};
use crate::domain::{
    models::{
        appointment::Appointment,
        domain_event::DomainEvent,
        schedule::{AllocationOutcome, ConflictedOccurrence, FailedOccurrence, Occurrence},
    },
    ports::{AppointmentRepository, EventSink},
};
use crate::error::AppError;

enum SlotStatus {
    Pending(Appointment),
    Reserved(Appointment),
    Conflicted,
    Failed(String),
}

/// Checks each occurrence against the fixed slot capacity and books the ones that fit.
pub struct CapacityAllocator {
    appointments: Arc<dyn AppointmentRepository>,
    events: Arc<dyn EventSink>,
    capacity: i64,
}

impl CapacityAllocator {
    pub fn new(appointments: Arc<dyn AppointmentRepository>, events: Arc<dyn EventSink>, capacity: i64) -> Self {
        Self { appointments, events, capacity }
    }

    /// Books as many `occurrences` as capacity allows.
    ///
    /// Never fails as a whole: every occurrence ends up in exactly one of
    /// `reserved`, `conflicted` or `failed`, each list in input order.
    pub async fn allocate(&self, student_id: &str, subscription_id: Option<&str>, occurrences: &[Occurrence]) -> AllocationOutcome {
        let mut statuses = Vec::with_capacity(occurrences.len());

        for occurrence in occurrences {
            match self.appointments.count_bookings(occurrence.date, &occurrence.hour).await {
                Ok(count) if count >= self.capacity => {
                    info!(date = %occurrence.date, hour = %occurrence.hour, count, "Slot at capacity");
                    statuses.push(SlotStatus::Conflicted);
                }
                Ok(_) => statuses.push(SlotStatus::Pending(self.new_appointment(student_id, subscription_id, occurrence))),
                Err(e) => {
                    // The insert path enforces capacity on its own; let it decide.
                    warn!(date = %occurrence.date, hour = %occurrence.hour, "Capacity check failed: {}", e);
                    statuses.push(SlotStatus::Pending(self.new_appointment(student_id, subscription_id, occurrence)));
                }
            }
        }

        let batch: Vec<Appointment> = statuses
            .iter()
            .filter_map(|s| match s {
                SlotStatus::Pending(a) => Some(a.clone()),
                _ => None,
            })
            .collect();

        if !batch.is_empty() {
            match self.appointments.insert_batch(&batch, self.capacity).await {
                Ok(inserted) => {
                    for status in statuses.iter_mut() {
                        if let SlotStatus::Pending(a) = status {
                            let stored = inserted.iter().find(|i| i.id == a.id).cloned().unwrap_or_else(|| a.clone());
                            *status = SlotStatus::Reserved(stored);
                        }
                    }
                }
                Err(e) => {
                    warn!(student_id, size = batch.len(), "Batch insert failed, falling back to single inserts: {}", e);
                    for status in statuses.iter_mut() {
                        if let SlotStatus::Pending(a) = status {
                            *status = self.insert_single(a).await;
                        }
                    }
                }
            }
        }

        let mut outcome = AllocationOutcome::default();
        for (occurrence, status) in occurrences.iter().zip(statuses) {
            match status {
                SlotStatus::Reserved(a) => outcome.reserved.push(a),
                SlotStatus::Conflicted => outcome.conflicted.push(ConflictedOccurrence::capacity_reached(occurrence)),
                SlotStatus::Failed(error) => outcome.failed.push(FailedOccurrence {
                    date: occurrence.date,
                    hour: occurrence.hour.clone(),
                    error,
                }),
                SlotStatus::Pending(_) => outcome.failed.push(FailedOccurrence {
                    date: occurrence.date,
                    hour: occurrence.hour.clone(),
                    error: "not attempted".to_string(),
                }),
            }
        }

        info!(
            student_id,
            reserved = outcome.reserved.len(),
            conflicted = outcome.conflicted.len(),
            failed = outcome.failed.len(),
            "Allocation finished"
        );

        if !outcome.reserved.is_empty() {
            self.events.publish(DomainEvent::AppointmentsChanged {
                student_id: student_id.to_string(),
                created: outcome.reserved.len(),
                deleted: 0,
            });
        }

        outcome
    }

    /// Re-checks the slot right before inserting so one allocator's own batch
    /// can never push a slot past capacity.
    async fn insert_single(&self, appointment: &Appointment) -> SlotStatus {
        match self.appointments.count_bookings(appointment.date, &appointment.hour).await {
            Ok(count) if count >= self.capacity => {
                info!(date = %appointment.date, hour = %appointment.hour, count, "Slot filled before single insert");
                return SlotStatus::Conflicted;
            }
            Ok(_) => {}
            Err(e) => {
                error!(date = %appointment.date, hour = %appointment.hour, "Capacity re-check failed: {}", e);
                return SlotStatus::Failed(e.to_string());
            }
        }

        match self.appointments.insert_one(appointment, self.capacity).await {
            Ok(stored) => SlotStatus::Reserved(stored),
            Err(AppError::SlotFull { .. }) => SlotStatus::Conflicted,
            Err(e) => {
                error!(date = %appointment.date, hour = %appointment.hour, "Single insert failed: {}", e);
                SlotStatus::Failed(e.to_string())
            }
        }
    }

    fn new_appointment(&self, student_id: &str, subscription_id: Option<&str>, occurrence: &Occurrence) -> Appointment {
        Appointment::new(student_id.to_string(), subscription_id.map(str::to_string), occurrence)
    }
}
