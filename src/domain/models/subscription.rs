use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Days, Months, NaiveDate, Utc};
use sqlx::FromRow;
use crate::domain::models::plan::Plan;

/// A paid period granting a student `weekly_frequency` classes per week.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Subscription {
    pub id: String,
    pub student_id: String,
    pub plan_id: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub weekly_frequency: i32,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}

pub struct NewSubscriptionParams {
    pub student_id: String,
    pub plan_id: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub weekly_frequency: i32,
    pub amount: f64,
}

impl Subscription {
    pub fn new(params: NewSubscriptionParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            student_id: params.student_id,
            plan_id: params.plan_id,
            start_date: params.start_date,
            end_date: params.end_date,
            weekly_frequency: params.weekly_frequency,
            amount: params.amount,
            created_at: Utc::now(),
        }
    }

    /// End date when the period is driven by a plan: `start + duration_days`.
    pub fn end_for_plan(start: NaiveDate, plan: &Plan) -> NaiveDate {
        let days = u64::try_from(plan.duration_days).unwrap_or(0);
        start.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
    }

    /// End date for a manually entered period: one calendar month after start.
    pub fn end_for_manual(start: NaiveDate) -> NaiveDate {
        start.checked_add_months(Months::new(1)).unwrap_or(NaiveDate::MAX)
    }
}
