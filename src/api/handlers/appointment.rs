use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::{
    requests::{DateRangeQuery, DeleteAppointmentQuery},
    responses::AppointmentsDeletedResponse,
};
use crate::domain::services::scheduling::RecurringBookingRequest;
use crate::error::AppError;
use std::sync::Arc;

/// Partial success is still 200: the body lists what was reserved, what hit
/// capacity and what failed.
pub async fn create_recurring(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RecurringBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = state.scheduler.schedule(&payload).await?;
    Ok(Json(outcome))
}

pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    Query(range): Query<DateRangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    if range.end < range.start {
        return Err(AppError::Validation("end must not be before start".into()));
    }
    let appointments = state.appointment_repo.list_by_range(range.start, range.end).await?;
    Ok(Json(appointments))
}

pub async fn delete_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<String>,
    Query(params): Query<DeleteAppointmentQuery>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state.lifecycle.delete_appointment(&appointment_id, params.cascade).await?;
    Ok(Json(AppointmentsDeletedResponse { deleted }))
}
