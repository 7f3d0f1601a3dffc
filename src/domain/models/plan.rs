use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Named template a subscription can be created from.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub weekly_frequency: i32,
    pub duration_days: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

pub struct NewPlanParams {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub weekly_frequency: i32,
    pub duration_days: i32,
}

impl Plan {
    pub fn new(params: NewPlanParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: params.name,
            description: params.description,
            price: params.price,
            weekly_frequency: params.weekly_frequency,
            duration_days: params.duration_days,
            active: true,
            created_at: Utc::now(),
        }
    }
}
