// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard, workout list and completion through the HTTP API.

use axum::body::Body;
use axum::http::StatusCode;
use fitsplit_tracker::db::Store;
use fitsplit_tracker::models::attendance::format_day;
use fitsplit_tracker::models::AttendanceSummary;
use fitsplit_tracker::time_utils::today_utc;
use tower::ServiceExt;

mod common;
use common::{authed, body_json, create_seeded_app, create_test_app, create_test_jwt};

fn get(uri: &str, token: &str) -> axum::http::Request<Body> {
    authed("GET", uri, token).body(Body::empty()).unwrap()
}

fn complete(day_id: &str, token: &str) -> axum::http::Request<Body> {
    authed("POST", &format!("/api/workouts/{}/complete", day_id), token)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_dashboard_creates_summary_once() {
    let app = create_seeded_app().await;
    let token = create_test_jwt("u1");
    let seeded_writes = app.db.write_count();

    let response = app
        .router
        .clone()
        .oneshot(get("/api/dashboard", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["days"].as_array().unwrap().len(), 5);
    assert_eq!(body["days"][0]["day"], "Monday");
    assert_eq!(body["days"][0]["completed"], false);
    assert_eq!(body["summary"]["streak"], 0);
    assert_eq!(body["summary"]["attended"], false);
    assert_eq!(body["attended_today"], false);
    assert_eq!(app.db.write_count(), seeded_writes + 1);

    app.router
        .oneshot(get("/api/dashboard", &token))
        .await
        .unwrap();
    assert_eq!(app.db.write_count(), seeded_writes + 1);
}

#[tokio::test]
async fn test_missing_split_is_empty_not_error() {
    let app = create_test_app();
    let token = create_test_jwt("u1");

    let response = app
        .router
        .oneshot(get("/api/workouts", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!([]));
}

#[tokio::test]
async fn test_workouts_focus_filter() {
    let app = create_seeded_app().await;
    let token = create_test_jwt("u1");

    let response = app
        .router
        .clone()
        .oneshot(get("/api/workouts?focus=chest", &token))
        .await
        .unwrap();
    let days = body_json(response).await;
    let titles: Vec<&str> = days
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Push Day", "Upper Body"]);

    let response = app
        .router
        .oneshot(get("/api/workouts?focus=all", &token))
        .await
        .unwrap();
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_complete_workout_then_same_day_noop() {
    let app = create_seeded_app().await;
    let token = create_test_jwt("u1");
    let today = format_day(today_utc());

    let response = app
        .router
        .clone()
        .oneshot(complete("0", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["summary"]["attended"], true);
    assert_eq!(body["summary"]["streak"], 1);
    assert_eq!(body["summary"]["total_sets_this_month"], 5);
    assert_eq!(body["summary"]["last_updated"], today.as_str());
    assert!(body["message"].is_string());

    let writes = app.db.write_count();
    let response = app
        .router
        .clone()
        .oneshot(complete("3", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["summary"]["total_sets_this_month"], 5);
    assert_eq!(app.db.write_count(), writes);

    let response = app
        .router
        .oneshot(get("/api/dashboard", &token))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["attended_today"], true);
}

#[tokio::test]
async fn test_complete_continues_existing_streak() {
    let app = create_seeded_app().await;
    let token = create_test_jwt("u1");
    app.db
        .set_attendance_summary(
            "u1",
            &AttendanceSummary {
                attended: true,
                streak: 3,
                last_updated: Some("2024-06-01".to_string()),
                total_sets_this_month: 20,
            },
        )
        .await
        .unwrap();

    let response = app
        .router
        .oneshot(complete("3", &token))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["summary"]["streak"], 4);
    // Thursday has four exercises
    assert_eq!(body["summary"]["total_sets_this_month"], 24);
}

#[tokio::test]
async fn test_complete_unknown_or_invalid_day() {
    let app = create_seeded_app().await;
    let token = create_test_jwt("u1");

    let response = app
        .router
        .clone()
        .oneshot(complete("9", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .router
        .clone()
        .oneshot(complete("monday", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert!(app.db.get_attendance_summary("u1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_database_failure_is_generic_error() {
    let app = create_seeded_app().await;
    let token = create_test_jwt("u1");
    app.db.set_offline(true);

    let response = app
        .router
        .oneshot(complete("0", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "database_error");
    assert!(body.get("details").is_none());
}
