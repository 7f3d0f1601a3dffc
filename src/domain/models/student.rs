use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub dni: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Student {
    pub fn new(name: String, dni: Option<String>, email: Option<String>, phone: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            dni,
            email,
            phone,
            created_at: Utc::now(),
        }
    }
}
