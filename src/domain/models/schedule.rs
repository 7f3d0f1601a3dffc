use serde::{Deserialize, Serialize};
use chrono::{NaiveDate, NaiveTime, Timelike};
use crate::domain::models::appointment::Appointment;

pub const MIN_WEEKDAY: u32 = 1; // Monday
pub const MAX_WEEKDAY: u32 = 5; // Friday
pub const MAX_WEEKLY_FREQUENCY: i32 = 5;

/// Capacity and operating hours fixed for one deployment.
#[derive(Debug, Clone)]
pub struct SchedulingRules {
    pub slot_capacity: i64,
    pub opening_hour: u32,
    pub closing_hour: u32,
}

impl Default for SchedulingRules {
    fn default() -> Self {
        Self {
            slot_capacity: 5,
            opening_hour: 8,
            closing_hour: 21,
        }
    }
}

impl SchedulingRules {
    /// Bookable hours as "HH:00" strings, opening to closing inclusive.
    pub fn operating_hours(&self) -> Vec<String> {
        (self.opening_hour..=self.closing_hour)
            .map(|h| format!("{:02}:00", h))
            .collect()
    }

    pub fn is_operating_hour(&self, hour: &str) -> bool {
        parse_slot_hour(hour)
            .is_some_and(|h| (self.opening_hour..=self.closing_hour).contains(&h))
    }
}

/// Returns the hour of day for a whole-hour "HH:00" string.
pub fn parse_slot_hour(hour: &str) -> Option<u32> {
    if hour.len() != 5 {
        return None;
    }
    let time = NaiveTime::parse_from_str(hour, "%H:%M").ok()?;
    if time.minute() != 0 {
        return None;
    }
    Some(time.hour())
}

/// One (weekday, hour) pair of a weekly recurrence. Weekday 1 = Monday .. 5 = Friday.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PatternEntry {
    pub weekday: u32,
    pub hour: String,
}

impl PatternEntry {
    pub fn new(weekday: u32, hour: &str) -> Self {
        Self { weekday, hour: hour.to_string() }
    }

    pub fn is_well_formed(&self) -> bool {
        (MIN_WEEKDAY..=MAX_WEEKDAY).contains(&self.weekday) && parse_slot_hour(&self.hour).is_some()
    }
}

/// A concrete dated slot produced by expanding a pattern.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Occurrence {
    pub date: NaiveDate,
    pub hour: String,
}

impl Occurrence {
    pub fn new(date: NaiveDate, hour: &str) -> Self {
        Self { date, hour: hour.to_string() }
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConflictReason {
    CapacityReached,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ConflictedOccurrence {
    pub date: NaiveDate,
    pub hour: String,
    pub reason: ConflictReason,
}

impl ConflictedOccurrence {
    pub fn capacity_reached(occurrence: &Occurrence) -> Self {
        Self {
            date: occurrence.date,
            hour: occurrence.hour.clone(),
            reason: ConflictReason::CapacityReached,
        }
    }
}

/// An occurrence whose insert failed for a reason other than capacity.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct FailedOccurrence {
    pub date: NaiveDate,
    pub hour: String,
    pub error: String,
}

#[derive(Debug, Serialize, Clone, Default)]
pub struct AllocationOutcome {
    pub reserved: Vec<Appointment>,
    pub conflicted: Vec<ConflictedOccurrence>,
    pub failed: Vec<FailedOccurrence>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_slot_hour() {
        assert_eq!(parse_slot_hour("09:00"), Some(9));
        assert_eq!(parse_slot_hour("21:00"), Some(21));
        assert_eq!(parse_slot_hour("9:00"), None);
        assert_eq!(parse_slot_hour("09:30"), None);
        assert_eq!(parse_slot_hour("25:00"), None);
        assert_eq!(parse_slot_hour("nine"), None);
    }

    #[test]
    fn test_operating_hours_are_inclusive() {
        let rules = SchedulingRules::default();
        let hours = rules.operating_hours();
        assert_eq!(hours.len(), 14);
        assert_eq!(hours.first().map(String::as_str), Some("08:00"));
        assert_eq!(hours.last().map(String::as_str), Some("21:00"));
        assert!(rules.is_operating_hour("21:00"));
        assert!(!rules.is_operating_hour("07:00"));
        assert!(!rules.is_operating_hour("22:00"));
    }

    #[test]
    fn test_pattern_entry_well_formed() {
        assert!(PatternEntry::new(1, "09:00").is_well_formed());
        assert!(PatternEntry::new(5, "21:00").is_well_formed());
        assert!(!PatternEntry::new(0, "09:00").is_well_formed());
        assert!(!PatternEntry::new(6, "09:00").is_well_formed());
        assert!(!PatternEntry::new(2, "9am").is_well_formed());
    }
}
