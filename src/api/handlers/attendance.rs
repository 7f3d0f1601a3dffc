use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::CheckInRequest;
use crate::error::AppError;
use chrono::Local;
use std::sync::Arc;

pub async fn check_in(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CheckInRequest>,
) -> Result<impl IntoResponse, AppError> {
    let dni = payload.dni.trim();
    if dni.is_empty() {
        return Err(AppError::Validation("DNI must not be empty".into()));
    }

    let checked_in = state.attendance_service.check_in(dni, Local::now().naive_local()).await?;
    Ok((StatusCode::CREATED, Json(checked_in)))
}
