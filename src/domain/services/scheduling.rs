use std::sync::Arc;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;
use crate::domain::{
    models::schedule::{AllocationOutcome, PatternEntry, SchedulingRules},
    ports::StudentRepository,
    services::{
        allocator::CapacityAllocator,
        recurrence::{default_window_days, expand, validate_pattern},
        subscription_binder::SubscriptionBinder,
    },
};
use crate::error::AppError;

/// Longest expansion window a single request may ask for.
pub const MAX_WINDOW_DAYS: i64 = 366;

#[derive(Debug, Deserialize, Clone)]
pub struct RecurringBookingRequest {
    pub student_id: String,
    pub subscription_id: Option<String>,
    pub start_date: NaiveDate,
    /// Defaults to the linked subscription's weekly frequency, then to the pattern length.
    pub frequency: Option<i32>,
    pub pattern: Vec<PatternEntry>,
    pub window_days: Option<i64>,
}

/// Validate, expand and allocate a weekly pattern in one call.
pub struct RecurringScheduler {
    students: Arc<dyn StudentRepository>,
    binder: Arc<SubscriptionBinder>,
    allocator: Arc<CapacityAllocator>,
    rules: SchedulingRules,
}

impl RecurringScheduler {
    pub fn new(
        students: Arc<dyn StudentRepository>,
        binder: Arc<SubscriptionBinder>,
        allocator: Arc<CapacityAllocator>,
        rules: SchedulingRules,
    ) -> Self {
        Self { students, binder, allocator, rules }
    }

    pub async fn schedule(&self, request: &RecurringBookingRequest) -> Result<AllocationOutcome, AppError> {
        self.students.find_by_id(&request.student_id).await?
            .ok_or(AppError::NotFound("Student not found".into()))?;

        let subscription = self.binder
            .resolve_for_booking(&request.student_id, request.subscription_id.as_deref())
            .await?;

        let frequency = request.frequency
            .or(subscription.as_ref().map(|s| s.weekly_frequency))
            .unwrap_or(request.pattern.len() as i32);

        validate_pattern(frequency, &request.pattern, &self.rules)?;

        let window_days = request.window_days.unwrap_or_else(|| default_window_days(request.start_date));
        if !(0..=MAX_WINDOW_DAYS).contains(&window_days) {
            return Err(AppError::Validation(format!("window_days must be between 0 and {}", MAX_WINDOW_DAYS)));
        }

        let occurrences = expand(request.start_date, frequency as usize, &request.pattern, window_days);
        info!(
            student_id = %request.student_id,
            start = %request.start_date,
            window_days,
            occurrences = occurrences.len(),
            "Expanded recurring pattern"
        );

        Ok(self.allocator
            .allocate(&request.student_id, request.subscription_id.as_deref(), &occurrences)
            .await)
    }
}
