use chrono::{Datelike, Days, Months, NaiveDate};
use std::collections::HashSet;
use tracing::{debug, warn};
use crate::domain::models::schedule::{
    Occurrence, PatternEntry, SchedulingRules, MAX_WEEKDAY, MAX_WEEKLY_FREQUENCY, MIN_WEEKDAY,
};
use crate::error::AppError;

const SUNDAY: i64 = 0;

/// Default expansion window: one calendar month plus seven days, in days.
pub fn default_window_days(start: NaiveDate) -> i64 {
    let end = start
        .checked_add_months(Months::new(1))
        .and_then(|d| d.checked_add_days(Days::new(7)))
        .unwrap_or(start);
    (end - start).num_days()
}

/// Rejects a pattern before expansion. Errors here are fatal to the whole request.
pub fn validate_pattern(frequency: i32, pattern: &[PatternEntry], rules: &SchedulingRules) -> Result<(), AppError> {
    if !(1..=MAX_WEEKLY_FREQUENCY).contains(&frequency) {
        return Err(AppError::Validation(format!("Weekly frequency must be between 1 and {}", MAX_WEEKLY_FREQUENCY)));
    }
    if pattern.len() != frequency as usize {
        return Err(AppError::Validation(format!(
            "Pattern has {} entries but the weekly frequency is {}", pattern.len(), frequency
        )));
    }

    let mut seen = HashSet::new();
    for entry in pattern {
        if !(MIN_WEEKDAY..=MAX_WEEKDAY).contains(&entry.weekday) {
            return Err(AppError::Validation(format!("Invalid weekday {} (expected 1=Mon..5=Fri)", entry.weekday)));
        }
        if !rules.is_operating_hour(&entry.hour) {
            return Err(AppError::Validation(format!("Invalid hour '{}'", entry.hour)));
        }
        if !seen.insert(entry.weekday) {
            return Err(AppError::Validation(format!("Weekday {} selected more than once", entry.weekday)));
        }
    }
    Ok(())
}

/// Expands a weekly pattern into dated occurrences within `[start, start + window_days]`.
///
/// Walks the window in 7-day strides anchored on `start`; for every stride and
/// entry it lands on the entry's weekday in that week, re-verifies the weekday
/// and corrects any drift before emitting. Malformed entries are skipped.
/// Only the first `frequency` entries are used. Output is sorted by (date, hour).
pub fn expand(start: NaiveDate, frequency: usize, pattern: &[PatternEntry], window_days: i64) -> Vec<Occurrence> {
    if pattern.len() != frequency {
        warn!(frequency, entries = pattern.len(), "Pattern length does not match weekly frequency");
    }

    let entries: Vec<&PatternEntry> = pattern
        .iter()
        .take(frequency)
        .filter(|entry| {
            let ok = entry.is_well_formed();
            if !ok {
                warn!(weekday = entry.weekday, hour = %entry.hour, "Skipping malformed pattern entry");
            }
            ok
        })
        .collect();

    let Some(end) = start.checked_add_days(Days::new(window_days.max(0) as u64)) else {
        return Vec::new();
    };

    let mut occurrences = Vec::new();
    let mut anchor = start;

    while anchor <= end {
        let anchor_weekday = weekday_index(anchor);

        for entry in &entries {
            let desired = entry.weekday as i64;
            let diff = if anchor_weekday == SUNDAY {
                desired
            } else if anchor == start && anchor_weekday == desired {
                0
            } else {
                let d = desired - anchor_weekday;
                if d < 0 { d + 7 } else { d }
            };

            let Some(mut date) = anchor.checked_add_days(Days::new(diff as u64)) else {
                continue;
            };

            let actual = weekday_index(date);
            if actual != desired {
                let adjust = if desired > actual { desired - actual } else { 7 - (actual - desired) };
                debug!(%date, desired, actual, adjust, "Correcting weekday drift");
                match date.checked_add_days(Days::new(adjust as u64)) {
                    Some(corrected) => date = corrected,
                    None => continue,
                }
            }

            if date >= start && date <= end {
                occurrences.push(Occurrence { date, hour: entry.hour.clone() });
            }
        }

        match anchor.checked_add_days(Days::new(7)) {
            Some(next) => anchor = next,
            None => break,
        }
    }

    occurrences.sort();
    occurrences
}

/// Sunday = 0 .. Saturday = 6.
fn weekday_index(date: NaiveDate) -> i64 {
    date.weekday().num_days_from_sunday() as i64
}
