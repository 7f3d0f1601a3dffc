use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateStudentRequest {
    pub name: String,
    pub dni: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Deserialize)]
pub struct CreatePlanRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub weekly_frequency: i32,
    pub duration_days: Option<i32>,
}

/// With `plan_id` the end date, frequency and amount come from the plan;
/// without it the period is one calendar month and `weekly_frequency` is required.
#[derive(Deserialize)]
pub struct CreateSubscriptionRequest {
    pub student_id: String,
    pub plan_id: Option<String>,
    pub start_date: NaiveDate,
    pub weekly_frequency: Option<i32>,
    pub amount: Option<f64>,
}

#[derive(Deserialize)]
pub struct UpdateSubscriptionRequest {
    pub plan_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub weekly_frequency: Option<i32>,
    pub amount: Option<f64>,
}

#[derive(Deserialize)]
pub struct DateRangeQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Deserialize)]
pub struct DeleteAppointmentQuery {
    #[serde(default)]
    pub cascade: bool,
}

#[derive(Deserialize)]
pub struct CheckInRequest {
    pub dni: String,
}
