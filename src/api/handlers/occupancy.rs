use axum::{extract::{State, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::DateRangeQuery;
use crate::domain::services::occupancy::occupancy;
use crate::error::AppError;
use std::sync::Arc;

pub async fn get_occupancy(
    State(state): State<Arc<AppState>>,
    Query(range): Query<DateRangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let grid = occupancy(state.appointment_repo.as_ref(), &state.rules, range.start, range.end).await?;
    Ok(Json(grid))
}
