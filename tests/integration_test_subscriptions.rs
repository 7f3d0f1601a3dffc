mod common;

use axum::http::StatusCode;
use chrono::{Days, Local, Months};
use common::{date, parse_body, TestApp, TestOptions};
use serde_json::json;
use studio_scheduler::domain::{
    models::{
        plan::{NewPlanParams, Plan},
        subscription::{NewSubscriptionParams, Subscription},
    },
    services::subscription_binder::{OverlapCheck, OverlapPolicy},
};

#[tokio::test]
async fn test_binder_blocks_start_before_active_end() {
    let app = TestApp::new().await;
    let student = app.seed_student("Ana", None).await;
    let active = app.seed_subscription(&student.id, "2024-01-01", "2024-01-31", 2).await;
    let today = date("2024-01-10");

    let check = app.state.binder
        .validate_new_subscription(&student.id, date("2024-01-15"), today)
        .await
        .unwrap();
    assert_eq!(check, OverlapCheck::Conflict {
        active_subscription_id: active.id.clone(),
        active_subscription_end: date("2024-01-31"),
    });

    let check = app.state.binder
        .validate_new_subscription(&student.id, date("2024-02-01"), today)
        .await
        .unwrap();
    assert_eq!(check, OverlapCheck::Ok);
}

#[tokio::test]
async fn test_binder_ignores_expired_and_other_students() {
    let app = TestApp::new().await;
    let ana = app.seed_student("Ana", None).await;
    let bea = app.seed_student("Bea", None).await;
    app.seed_subscription(&ana.id, "2024-01-01", "2024-01-31", 2).await;

    // Nothing active on 2024-02-10
    let check = app.state.binder
        .validate_new_subscription(&ana.id, date("2024-01-20"), date("2024-02-10"))
        .await
        .unwrap();
    assert_eq!(check, OverlapCheck::Ok);

    let check = app.state.binder
        .validate_new_subscription(&bea.id, date("2024-01-15"), date("2024-01-10"))
        .await
        .unwrap();
    assert_eq!(check, OverlapCheck::Ok);
}

#[tokio::test]
async fn test_binder_edit_excludes_itself() {
    let app = TestApp::new().await;
    let student = app.seed_student("Ana", None).await;
    let active = app.seed_subscription(&student.id, "2024-01-01", "2024-01-31", 2).await;

    let check = app.state.binder
        .validate_edit(&active.id, &student.id, date("2024-01-05"), date("2024-01-10"))
        .await
        .unwrap();
    assert_eq!(check, OverlapCheck::Ok);
}

#[tokio::test]
async fn test_create_subscription_from_plan_derives_end_date() {
    let app = TestApp::new().await;
    let student = app.seed_student("Ana", None).await;

    let plan_res = app.request("POST", "/api/v1/plans", Some(json!({
        "name": "Dos veces",
        "price": 15000.0,
        "weekly_frequency": 2
    }))).await;
    assert_eq!(plan_res.status(), StatusCode::CREATED);
    let plan = parse_body(plan_res).await;
    assert_eq!(plan["duration_days"], 30);

    let res = app.request("POST", "/api/v1/subscriptions", Some(json!({
        "student_id": student.id,
        "plan_id": plan["id"],
        "start_date": "2020-01-31"
    }))).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body = parse_body(res).await;
    assert_eq!(body["subscription"]["end_date"], "2020-03-01");
    assert_eq!(body["subscription"]["weekly_frequency"], 2);
    assert_eq!(body["subscription"]["amount"], 15000.0);
    assert!(body["shifted_from"].is_null());
}

#[tokio::test]
async fn test_manual_subscription_requires_frequency() {
    let app = TestApp::new().await;
    let student = app.seed_student("Ana", None).await;

    let res = app.request("POST", "/api/v1/subscriptions", Some(json!({
        "student_id": student.id,
        "start_date": "2020-01-15"
    }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.request("POST", "/api/v1/subscriptions", Some(json!({
        "student_id": student.id,
        "start_date": "2020-01-15",
        "weekly_frequency": 3,
        "amount": 9000.0
    }))).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = parse_body(res).await;
    assert_eq!(body["subscription"]["end_date"], "2020-02-15");
}

#[tokio::test]
async fn test_overlapping_subscription_is_rejected_over_http() {
    let app = TestApp::new().await;
    let student = app.seed_student("Ana", None).await;

    let today = Local::now().date_naive();
    let start = today - Days::new(5);
    let end = today + Days::new(20);
    app.seed_subscription(&student.id, &start.to_string(), &end.to_string(), 2).await;

    let res = app.request("POST", "/api/v1/subscriptions", Some(json!({
        "student_id": student.id,
        "start_date": (today + Days::new(3)).to_string(),
        "weekly_frequency": 2
    }))).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body = parse_body(res).await;
    assert_eq!(body["active_subscription_end"], end.to_string());

    let res = app.request("POST", "/api/v1/subscriptions", Some(json!({
        "student_id": student.id,
        "start_date": (end + Days::new(1)).to_string(),
        "weekly_frequency": 2
    }))).await;
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_shift_policy_moves_start_after_active_end() {
    let app = TestApp::with_options(TestOptions {
        overlap_policy: OverlapPolicy::ShiftStart,
        ..TestOptions::default()
    }).await;
    let student = app.seed_student("Ana", None).await;

    let today = Local::now().date_naive();
    let end = today + Days::new(10);
    app.seed_subscription(&student.id, &(today - Days::new(5)).to_string(), &end.to_string(), 2).await;

    let requested = today + Days::new(1);
    let res = app.request("POST", "/api/v1/subscriptions", Some(json!({
        "student_id": student.id,
        "start_date": requested.to_string(),
        "weekly_frequency": 2
    }))).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body = parse_body(res).await;
    let shifted = end + Days::new(1);
    assert_eq!(body["subscription"]["start_date"], shifted.to_string());
    assert_eq!(body["subscription"]["end_date"], (shifted + Months::new(1)).to_string());
    assert_eq!(body["shifted_from"], requested.to_string());
}

#[tokio::test]
async fn test_update_subscription_rederives_end_date() {
    let app = TestApp::new().await;
    let student = app.seed_student("Ana", None).await;
    let subscription = app.seed_subscription(&student.id, "2020-01-01", "2020-02-01", 2).await;

    let res = app.request("PUT", &format!("/api/v1/subscriptions/{}", subscription.id), Some(json!({
        "start_date": "2020-03-10",
        "weekly_frequency": 3
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body = parse_body(res).await;
    assert_eq!(body["subscription"]["start_date"], "2020-03-10");
    assert_eq!(body["subscription"]["end_date"], "2020-04-10");
    assert_eq!(body["subscription"]["weekly_frequency"], 3);
}

#[tokio::test]
async fn test_delete_subscription_over_http() {
    let app = TestApp::new().await;
    let student = app.seed_student("Ana", None).await;
    let subscription = app.seed_subscription(&student.id, "2020-01-01", "2020-01-31", 1).await;
    app.seed_appointment(&student.id, Some(&subscription.id), "2020-01-06", "09:00").await;

    let res = app.request("DELETE", &format!("/api/v1/subscriptions/{}", subscription.id), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["appointments_deleted"], 1);
    assert!(body["cascade_error"].is_null());

    let res = app.request("GET", &format!("/api/v1/students/{}/subscriptions", student.id), None).await;
    assert_eq!(parse_body(res).await.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_retired_plan_blocks_new_subscriptions_but_not_edits() {
    let app = TestApp::new().await;
    let student = app.seed_student("Ana", None).await;

    let plan = app.state.plan_repo.create(&Plan::new(NewPlanParams {
        name: "Tres veces".into(),
        description: None,
        price: 12000.0,
        weekly_frequency: 3,
        duration_days: 30,
    })).await.unwrap();
    let subscription = app.state.subscription_repo.create(&Subscription::new(NewSubscriptionParams {
        student_id: student.id.clone(),
        plan_id: Some(plan.id.clone()),
        start_date: date("2020-01-01"),
        end_date: date("2020-01-31"),
        weekly_frequency: 3,
        amount: 12000.0,
    })).await.unwrap();

    sqlx::query("UPDATE plans SET active = 0 WHERE id = ?")
        .bind(&plan.id)
        .execute(&app.pool)
        .await
        .unwrap();

    let res = app.request("PUT", &format!("/api/v1/subscriptions/{}", subscription.id), Some(json!({
        "amount": 10000.0
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["subscription"]["amount"], 10000.0);
    assert_eq!(body["subscription"]["end_date"], "2020-01-31");

    let res = app.request("POST", "/api/v1/subscriptions", Some(json!({
        "student_id": student.id,
        "plan_id": plan.id,
        "start_date": "2020-03-01"
    }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
