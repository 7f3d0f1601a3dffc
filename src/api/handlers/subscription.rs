use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::{
    requests::{CreateSubscriptionRequest, UpdateSubscriptionRequest},
    responses::SubscriptionResponse,
};
use crate::domain::models::{
    plan::Plan,
    schedule::MAX_WEEKLY_FREQUENCY,
    subscription::{NewSubscriptionParams, Subscription},
};
use crate::error::AppError;
use chrono::{Local, NaiveDate};
use std::sync::Arc;
use tracing::info;

/// Retired plans can no longer be chosen, but subscriptions already on one stay editable.
async fn load_plan(state: &AppState, plan_id: Option<&str>, require_active: bool) -> Result<Option<Plan>, AppError> {
    let Some(id) = plan_id else {
        return Ok(None);
    };
    let plan = state.plan_repo.find_by_id(id).await?
        .ok_or(AppError::NotFound("Plan not found".into()))?;
    if require_active && !plan.active {
        return Err(AppError::Validation("Plan is no longer offered".into()));
    }
    Ok(Some(plan))
}

fn end_date_for(start: NaiveDate, plan: Option<&Plan>) -> NaiveDate {
    match plan {
        Some(plan) => Subscription::end_for_plan(start, plan),
        None => Subscription::end_for_manual(start),
    }
}

fn check_frequency(weekly_frequency: i32) -> Result<(), AppError> {
    if !(1..=MAX_WEEKLY_FREQUENCY).contains(&weekly_frequency) {
        return Err(AppError::Validation(format!("weekly_frequency must be between 1 and {}", MAX_WEEKLY_FREQUENCY)));
    }
    Ok(())
}

pub async fn create_subscription(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateSubscriptionRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.student_repo.find_by_id(&payload.student_id).await?
        .ok_or(AppError::NotFound("Student not found".into()))?;

    let plan = load_plan(&state, payload.plan_id.as_deref(), true).await?;

    let weekly_frequency = payload.weekly_frequency
        .or(plan.as_ref().map(|p| p.weekly_frequency))
        .ok_or(AppError::Validation("weekly_frequency is required without a plan".into()))?;
    check_frequency(weekly_frequency)?;

    let amount = payload.amount.or(plan.as_ref().map(|p| p.price)).unwrap_or(0.0);

    let today = Local::now().date_naive();
    let check = state.binder
        .validate_new_subscription(&payload.student_id, payload.start_date, today)
        .await?;
    let start_date = state.config.overlap_policy.resolve_start(&check, payload.start_date)?;

    let subscription = Subscription::new(NewSubscriptionParams {
        student_id: payload.student_id,
        plan_id: payload.plan_id,
        start_date,
        end_date: end_date_for(start_date, plan.as_ref()),
        weekly_frequency,
        amount,
    });
    let created = state.subscription_repo.create(&subscription).await?;
    info!(
        subscription_id = %created.id,
        student_id = %created.student_id,
        start = %created.start_date,
        end = %created.end_date,
        "Subscription created"
    );

    Ok((StatusCode::CREATED, Json(SubscriptionResponse {
        shifted_from: (start_date != payload.start_date).then_some(payload.start_date),
        subscription: created,
    })))
}

pub async fn update_subscription(
    State(state): State<Arc<AppState>>,
    Path(subscription_id): Path<String>,
    Json(payload): Json<UpdateSubscriptionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut subscription = state.subscription_repo.find_by_id(&subscription_id).await?
        .ok_or(AppError::NotFound("Subscription not found".into()))?;

    let plan_changed = payload.plan_id.is_some() && payload.plan_id != subscription.plan_id;
    if payload.plan_id.is_some() {
        subscription.plan_id = payload.plan_id;
    }
    let plan = load_plan(&state, subscription.plan_id.as_deref(), plan_changed).await?;

    if let Some(weekly_frequency) = payload.weekly_frequency {
        check_frequency(weekly_frequency)?;
        subscription.weekly_frequency = weekly_frequency;
    } else if plan_changed && let Some(p) = &plan {
        subscription.weekly_frequency = p.weekly_frequency;
    }
    if let Some(amount) = payload.amount {
        subscription.amount = amount;
    }

    let requested_start = payload.start_date.unwrap_or(subscription.start_date);
    let today = Local::now().date_naive();
    let check = state.binder
        .validate_edit(&subscription.id, &subscription.student_id, requested_start, today)
        .await?;
    let start_date = state.config.overlap_policy.resolve_start(&check, requested_start)?;

    if start_date != subscription.start_date || plan_changed {
        subscription.start_date = start_date;
        subscription.end_date = end_date_for(start_date, plan.as_ref());
    }

    let updated = state.subscription_repo.update(&subscription).await?;
    info!(subscription_id = %updated.id, start = %updated.start_date, end = %updated.end_date, "Subscription updated");

    Ok(Json(SubscriptionResponse {
        shifted_from: (start_date != requested_start).then_some(requested_start),
        subscription: updated,
    }))
}

pub async fn delete_subscription(
    State(state): State<Arc<AppState>>,
    Path(subscription_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let deletion = state.lifecycle.delete_subscription(&subscription_id).await?;
    Ok(Json(deletion))
}
