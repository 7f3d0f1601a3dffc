use std::collections::HashMap;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use crate::domain::{
    models::schedule::SchedulingRules,
    ports::AppointmentRepository,
};
use crate::error::AppError;

const MAX_RANGE_DAYS: i64 = 62;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct SlotOccupancy {
    pub date: NaiveDate,
    pub hour: String,
    pub booked: i64,
    pub remaining: i64,
}

/// Booked and remaining capacity for every weekday slot in `[start, end]`.
pub async fn occupancy(
    repo: &dyn AppointmentRepository,
    rules: &SchedulingRules,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<SlotOccupancy>, AppError> {
    if end < start {
        return Err(AppError::Validation("end must not be before start".into()));
    }
    if (end - start).num_days() > MAX_RANGE_DAYS {
        return Err(AppError::Validation(format!("Range must not exceed {} days", MAX_RANGE_DAYS)));
    }

    let counts: HashMap<(NaiveDate, String), i64> = repo
        .count_by_range(start, end)
        .await?
        .into_iter()
        .map(|c| ((c.date, c.hour), c.booked))
        .collect();

    let hours = rules.operating_hours();
    let mut grid = Vec::new();

    for date in start.iter_days().take_while(|d| *d <= end) {
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            continue;
        }
        for hour in &hours {
            let booked = counts.get(&(date, hour.clone())).copied().unwrap_or(0);
            grid.push(SlotOccupancy {
                date,
                hour: hour.clone(),
                booked,
                remaining: (rules.slot_capacity - booked).max(0),
            });
        }
    }
    Ok(grid)
}
