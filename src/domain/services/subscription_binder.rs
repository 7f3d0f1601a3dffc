use std::str::FromStr;
use std::sync::Arc;
use chrono::{Days, NaiveDate};
use serde::Serialize;
use tracing::info;
use crate::domain::{
    models::subscription::Subscription,
    ports::SubscriptionRepository,
};
use crate::error::AppError;

/// Result of an overlap check. The binder only detects; callers decide remediation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OverlapCheck {
    Ok,
    Conflict {
        active_subscription_id: String,
        active_subscription_end: NaiveDate,
    },
}

/// Remediation applied by callers when `OverlapCheck::Conflict` is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapPolicy {
    Reject,
    ShiftStart,
}

impl FromStr for OverlapPolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reject" => Ok(OverlapPolicy::Reject),
            "shift" | "shift_start" => Ok(OverlapPolicy::ShiftStart),
            other => Err(AppError::Validation(format!("Unknown overlap policy '{}'", other))),
        }
    }
}

impl OverlapPolicy {
    /// Start date to use, or `SubscriptionOverlap` when the policy rejects.
    pub fn resolve_start(self, check: &OverlapCheck, proposed_start: NaiveDate) -> Result<NaiveDate, AppError> {
        match (check, self) {
            (OverlapCheck::Ok, _) => Ok(proposed_start),
            (OverlapCheck::Conflict { active_subscription_end, .. }, OverlapPolicy::Reject) => {
                Err(AppError::SubscriptionOverlap { active_end: *active_subscription_end })
            }
            (OverlapCheck::Conflict { active_subscription_end, .. }, OverlapPolicy::ShiftStart) => {
                active_subscription_end
                    .checked_add_days(Days::new(1))
                    .ok_or(AppError::Validation("Shifted start date out of range".into()))
            }
        }
    }
}

/// Guards the "one active subscription per student" invariant and links
/// bookings to the subscription that paid for them.
pub struct SubscriptionBinder {
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl SubscriptionBinder {
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>) -> Self {
        Self { subscriptions }
    }

    pub async fn validate_new_subscription(&self, student_id: &str, proposed_start: NaiveDate, today: NaiveDate) -> Result<OverlapCheck, AppError> {
        self.check(student_id, proposed_start, today, None).await
    }

    /// Same check as creation, ignoring the subscription being edited.
    pub async fn validate_edit(&self, subscription_id: &str, student_id: &str, proposed_start: NaiveDate, today: NaiveDate) -> Result<OverlapCheck, AppError> {
        self.check(student_id, proposed_start, today, Some(subscription_id)).await
    }

    /// Loads the subscription a booking should be linked to and checks it belongs to the student.
    pub async fn resolve_for_booking(&self, student_id: &str, subscription_id: Option<&str>) -> Result<Option<Subscription>, AppError> {
        let Some(id) = subscription_id else {
            return Ok(None);
        };

        let subscription = self.subscriptions.find_by_id(id).await?
            .ok_or(AppError::NotFound("Subscription not found".into()))?;

        if subscription.student_id != student_id {
            return Err(AppError::Validation("Subscription belongs to another student".into()));
        }
        Ok(Some(subscription))
    }

    async fn check(&self, student_id: &str, proposed_start: NaiveDate, today: NaiveDate, exclude_id: Option<&str>) -> Result<OverlapCheck, AppError> {
        let active = self.subscriptions.find_overlapping(student_id, today, exclude_id).await?;

        match active {
            Some(sub) if proposed_start < sub.end_date => {
                info!(student_id, active_subscription = %sub.id, active_end = %sub.end_date, %proposed_start, "Subscription overlap detected");
                Ok(OverlapCheck::Conflict {
                    active_subscription_id: sub.id,
                    active_subscription_end: sub.end_date,
                })
            }
            _ => Ok(OverlapCheck::Ok),
        }
    }
}
