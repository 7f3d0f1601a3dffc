use axum::{
    body::Body,
    extract::Request,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{health, student, plan, subscription, appointment, occupancy, attendance};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Students & plans
        .route("/api/v1/students", post(student::create_student).get(student::list_students))
        .route("/api/v1/students/{student_id}/subscriptions", get(student::list_student_subscriptions))
        .route("/api/v1/plans", post(plan::create_plan).get(plan::list_plans))

        // Subscriptions
        .route("/api/v1/subscriptions", post(subscription::create_subscription))
        .route("/api/v1/subscriptions/{subscription_id}", put(subscription::update_subscription).delete(subscription::delete_subscription))

        // Appointments
        .route("/api/v1/appointments", get(appointment::list_appointments))
        .route("/api/v1/appointments/recurring", post(appointment::create_recurring))
        .route("/api/v1/appointments/{appointment_id}", delete(appointment::delete_appointment))
        .route("/api/v1/occupancy", get(occupancy::get_occupancy))

        // Front desk
        .route("/api/v1/attendance", post(attendance::check_in))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
