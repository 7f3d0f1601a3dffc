use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::CreateStudentRequest;
use crate::domain::models::student::Student;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_student(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateStudentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Name must not be empty".into()));
    }
    let dni = payload.dni.map(|d| d.trim().to_string()).filter(|d| !d.is_empty());
    if let Some(dni) = &dni
        && state.student_repo.find_by_dni(dni).await?.is_some()
    {
        return Err(AppError::Conflict("A student with that DNI already exists".into()));
    }

    let student = Student::new(name.to_string(), dni, payload.email, payload.phone);
    let created = state.student_repo.create(&student).await?;
    info!(student_id = %created.id, "Student created");

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_students(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let students = state.student_repo.list().await?;
    Ok(Json(students))
}

pub async fn list_student_subscriptions(
    State(state): State<Arc<AppState>>,
    Path(student_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.student_repo.find_by_id(&student_id).await?
        .ok_or(AppError::NotFound("Student not found".into()))?;

    let subscriptions = state.subscription_repo.list_by_student(&student_id).await?;
    Ok(Json(subscriptions))
}
