use std::env;
use crate::domain::models::schedule::SchedulingRules;
use crate::domain::services::subscription_binder::OverlapPolicy;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub slot_capacity: i64,
    pub opening_hour: u32,
    pub closing_hour: u32, // inclusive: the last class starts at this hour
    pub subscription_days: i32,
    pub overlap_policy: OverlapPolicy,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env_or("PORT", 3000),
            slot_capacity: env_or("SLOT_CAPACITY", 5),
            opening_hour: env_or("OPENING_HOUR", 8),
            closing_hour: env_or("CLOSING_HOUR", 21),
            subscription_days: env_or("SUBSCRIPTION_DAYS", 30),
            overlap_policy: env::var("OVERLAP_POLICY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(OverlapPolicy::Reject),
        }
    }

    pub fn rules(&self) -> SchedulingRules {
        SchedulingRules {
            slot_capacity: self.slot_capacity,
            opening_hour: self.opening_hour,
            closing_hour: self.closing_hour,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}
