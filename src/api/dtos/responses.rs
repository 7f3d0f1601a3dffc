use chrono::NaiveDate;
use serde::Serialize;
use crate::domain::models::subscription::Subscription;

#[derive(Serialize)]
pub struct SubscriptionResponse {
    pub subscription: Subscription,
    /// The requested start when the overlap policy moved it.
    pub shifted_from: Option<NaiveDate>,
}

#[derive(Serialize)]
pub struct AppointmentsDeletedResponse {
    pub deleted: u64,
}
