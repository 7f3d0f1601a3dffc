mod common;

use axum::http::StatusCode;
use chrono::{Days, Local};
use common::{parse_body, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let res = app.request("GET", "/health", None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["status"], "ok");
}

#[tokio::test]
async fn test_students_create_and_list() {
    let app = TestApp::new().await;

    let res = app.request("POST", "/api/v1/students", Some(json!({
        "name": "Ana Pérez", "dni": "30111222", "email": "ana@example.com"
    }))).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    // DNI identifies the student at the front desk
    let res = app.request("POST", "/api/v1/students", Some(json!({
        "name": "Otra Ana", "dni": "30111222"
    }))).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = app.request("POST", "/api/v1/students", Some(json!({ "name": "  " }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.request("GET", "/api/v1/students", None).await;
    let students = parse_body(res).await;
    assert_eq!(students.as_array().unwrap().len(), 1);
    assert_eq!(students[0]["dni"], "30111222");
}

#[tokio::test]
async fn test_plan_validation() {
    let app = TestApp::new().await;

    let res = app.request("POST", "/api/v1/plans", Some(json!({
        "name": "Seis veces", "price": 1.0, "weekly_frequency": 6
    }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.request("POST", "/api/v1/plans", Some(json!({
        "name": "Tres veces", "price": 1.0, "weekly_frequency": 3, "duration_days": 60
    }))).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let plans = parse_body(app.request("GET", "/api/v1/plans", None).await).await;
    assert_eq!(plans[0]["duration_days"], 60);
    assert_eq!(plans[0]["active"], true);
}

#[tokio::test]
async fn test_recurring_booking_reports_partial_success() {
    let app = TestApp::new().await;
    app.fill_slot("2024-03-04", "09:00", 5).await;
    let student = app.seed_student("Ana", None).await;

    let res = app.request("POST", "/api/v1/appointments/recurring", Some(json!({
        "student_id": student.id,
        "start_date": "2024-03-04",
        "frequency": 2,
        "pattern": [{"weekday": 1, "hour": "09:00"}, {"weekday": 3, "hour": "10:00"}],
        "window_days": 13
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body = parse_body(res).await;
    let reserved = body["reserved"].as_array().unwrap();
    let conflicted = body["conflicted"].as_array().unwrap();
    assert_eq!(reserved.len(), 3);
    assert_eq!(conflicted.len(), 1);
    assert_eq!(conflicted[0]["date"], "2024-03-04");
    assert_eq!(conflicted[0]["reason"], "capacity_reached");
    assert_eq!(reserved[0]["date"], "2024-03-06");
    assert_eq!(reserved[1]["date"], "2024-03-11");
    assert_eq!(reserved[2]["date"], "2024-03-13");
    assert!(body["failed"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_recurring_booking_rejects_bad_pattern() {
    let app = TestApp::new().await;
    let student = app.seed_student("Ana", None).await;

    let res = app.request("POST", "/api/v1/appointments/recurring", Some(json!({
        "student_id": student.id,
        "start_date": "2024-03-04",
        "frequency": 2,
        "pattern": [{"weekday": 1, "hour": "09:00"}]
    }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.request("POST", "/api/v1/appointments/recurring", Some(json!({
        "student_id": "missing",
        "start_date": "2024-03-04",
        "pattern": [{"weekday": 1, "hour": "09:00"}]
    }))).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_and_cascade_delete_appointments() {
    let app = TestApp::new().await;
    let student = app.seed_student("Ana", None).await;
    let first = app.seed_appointment(&student.id, None, "2024-03-04", "18:00").await;
    app.seed_appointment(&student.id, None, "2024-03-11", "18:00").await;
    app.seed_appointment(&student.id, None, "2024-03-18", "18:00").await;

    let res = app.request("GET", "/api/v1/appointments?start=2024-03-01&end=2024-03-31", None).await;
    assert_eq!(parse_body(res).await.as_array().unwrap().len(), 3);

    let res = app.request("DELETE", &format!("/api/v1/appointments/{}?cascade=true", first.id), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["deleted"], 3);

    let res = app.request("GET", "/api/v1/appointments?start=2024-03-01&end=2024-03-31", None).await;
    assert!(parse_body(res).await.as_array().unwrap().is_empty());

    let res = app.request("DELETE", &format!("/api/v1/appointments/{}", first.id), None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_occupancy_grid_counts_remaining_capacity() {
    let app = TestApp::new().await;
    app.fill_slot("2024-03-04", "09:00", 2).await;

    // Monday to Sunday: weekend days are left out
    let res = app.request("GET", "/api/v1/occupancy?start=2024-03-04&end=2024-03-10", None).await;
    assert_eq!(res.status(), StatusCode::OK);

    let grid = parse_body(res).await;
    let slots = grid.as_array().unwrap();
    assert_eq!(slots.len(), 5 * 14);

    let nine = slots.iter().find(|s| s["date"] == "2024-03-04" && s["hour"] == "09:00").unwrap();
    assert_eq!(nine["booked"], 2);
    assert_eq!(nine["remaining"], 3);

    let res = app.request("GET", "/api/v1/occupancy?start=2024-03-10&end=2024-03-04", None).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_attendance_check_in_lists_remaining_classes() {
    let app = TestApp::new().await;
    let student = app.seed_student("Ana", Some("30111222")).await;

    let today = Local::now().date_naive();
    let subscription = app.seed_subscription(
        &student.id,
        &(today - Days::new(3)).to_string(),
        &(today + Days::new(20)).to_string(),
        2,
    ).await;
    app.seed_appointment(&student.id, Some(&subscription.id), &(today - Days::new(1)).to_string(), "09:00").await;
    app.seed_appointment(&student.id, Some(&subscription.id), &(today + Days::new(1)).to_string(), "09:00").await;
    app.seed_appointment(&student.id, Some(&subscription.id), &(today + Days::new(8)).to_string(), "09:00").await;
    app.seed_appointment(&student.id, Some(&subscription.id), &(today + Days::new(30)).to_string(), "09:00").await;

    let res = app.request("POST", "/api/v1/attendance", Some(json!({ "dni": "30111222" }))).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body = parse_body(res).await;
    assert_eq!(body["student"]["id"], student.id);
    assert_eq!(body["active_subscription"]["id"], subscription.id);
    assert_eq!(body["remaining_appointments"].as_array().unwrap().len(), 2);
    assert_eq!(body["attendance"]["student_id"], student.id);

    let recorded = app.state.attendance_repo.list_by_student(&student.id).await.unwrap();
    assert_eq!(recorded.len(), 1);

    let res = app.request("POST", "/api/v1/attendance", Some(json!({ "dni": "99999999" }))).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
