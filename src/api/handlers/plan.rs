use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::CreatePlanRequest;
use crate::domain::models::{plan::{NewPlanParams, Plan}, schedule::MAX_WEEKLY_FREQUENCY};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_plan(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreatePlanRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Name must not be empty".into()));
    }
    if !(1..=MAX_WEEKLY_FREQUENCY).contains(&payload.weekly_frequency) {
        return Err(AppError::Validation(format!("weekly_frequency must be between 1 and {}", MAX_WEEKLY_FREQUENCY)));
    }
    if payload.price < 0.0 {
        return Err(AppError::Validation("price must not be negative".into()));
    }

    let duration_days = payload.duration_days.unwrap_or(state.config.subscription_days);
    if duration_days < 1 {
        return Err(AppError::Validation("duration_days must be positive".into()));
    }

    let plan = Plan::new(NewPlanParams {
        name: payload.name.trim().to_string(),
        description: payload.description,
        price: payload.price,
        weekly_frequency: payload.weekly_frequency,
        duration_days,
    });
    let created = state.plan_repo.create(&plan).await?;
    info!(plan_id = %created.id, "Plan created");

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_plans(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let plans = state.plan_repo.list().await?;
    Ok(Json(plans))
}
