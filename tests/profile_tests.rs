// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile editing through the multipart API.

use axum::body::Body;
use axum::http::StatusCode;
use fitsplit_tracker::db::Store;
use fitsplit_tracker::models::User;
use tower::ServiceExt;

mod common;
use common::{authed, body_json, create_test_app, create_test_jwt, multipart_request, TestImage};

const MIB: usize = 1024 * 1024;

#[tokio::test]
async fn test_oversized_image_rejected_before_any_remote_call() {
    let app = create_test_app();
    let token = create_test_jwt("u1");

    let response = app
        .router
        .oneshot(multipart_request(
            &token,
            &[("name", "Ada"), ("bio", "")],
            Some(TestImage {
                content_type: "image/jpeg",
                body: vec![0xFF; 5 * MIB],
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["details"], "Max file size is 2MB");
    assert_eq!(app.storage.call_count(), 0);
    assert_eq!(app.db.write_count(), 0);
}

#[tokio::test]
async fn test_non_image_rejected_before_any_remote_call() {
    let app = create_test_app();
    let token = create_test_jwt("u1");

    let response = app
        .router
        .oneshot(multipart_request(
            &token,
            &[("name", "Ada")],
            Some(TestImage {
                content_type: "application/pdf",
                body: b"%PDF-1.7".to_vec(),
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["details"],
        "Only image files are allowed"
    );
    assert_eq!(app.storage.call_count(), 0);
    assert_eq!(app.db.write_count(), 0);
}

#[tokio::test]
async fn test_save_profile_with_image() {
    let app = create_test_app();
    let token = create_test_jwt("u1");

    let response = app
        .router
        .oneshot(multipart_request(
            &token,
            &[("name", "Ada"), ("bio", "Squats")],
            Some(TestImage {
                content_type: "image/png",
                body: vec![1, 2, 3, 4],
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["user"]["name"], "Ada");
    assert_eq!(body["user"]["bio"], "Squats");
    assert_eq!(
        body["user"]["photo_url"],
        "https://storage.local/users/u1/profile.jpg"
    );

    let stored = app.storage.get("users/u1/profile.jpg").unwrap();
    assert_eq!(stored.content_type, "image/png");
    assert_eq!(&stored.body[..], &[1u8, 2, 3, 4][..]);
}

#[tokio::test]
async fn test_save_profile_without_image_keeps_fields() {
    let app = create_test_app();
    let token = create_test_jwt("u1");

    app.router
        .clone()
        .oneshot(multipart_request(&token, &[("name", "Ada"), ("bio", "Squats")], None))
        .await
        .unwrap();
    let response = app
        .router
        .oneshot(multipart_request(&token, &[("bio", "Deadlifts")], None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let user = app.db.get_user("u1").await.unwrap().unwrap();
    assert_eq!(user.name.as_deref(), Some("Ada"));
    assert_eq!(user.bio.as_deref(), Some("Deadlifts"));
    assert_eq!(user.photo_url.as_deref(), Some(""));
    assert!(user.updated_at.is_some());
    assert_eq!(app.storage.call_count(), 0);
}

#[tokio::test]
async fn test_delete_image_without_stored_image_leaves_record() {
    let app = create_test_app();
    let token = create_test_jwt("u1");
    let stored = User {
        uid: "u1".to_string(),
        email: "u1@example.com".to_string(),
        photo_url: Some("https://storage.local/users/u1/profile.jpg".to_string()),
        ..Default::default()
    };
    app.db.upsert_user(&stored).await.unwrap();

    let response = app
        .router
        .oneshot(
            authed("DELETE", "/api/profile/image", &token)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["error"], "storage_error");
    assert_eq!(app.db.get_user("u1").await.unwrap(), Some(stored));
}

#[tokio::test]
async fn test_delete_image_after_upload() {
    let app = create_test_app();
    let token = create_test_jwt("u1");

    app.router
        .clone()
        .oneshot(multipart_request(
            &token,
            &[],
            Some(TestImage {
                content_type: "image/jpeg",
                body: vec![0xFF, 0xD8],
            }),
        ))
        .await
        .unwrap();

    let response = app
        .router
        .oneshot(
            authed("DELETE", "/api/profile/image", &token)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["user"]["photo_url"], "");
    assert!(app.storage.get("users/u1/profile.jpg").is_none());
}

#[tokio::test]
async fn test_upload_fails_when_object_store_down() {
    let app = create_test_app();
    let token = create_test_jwt("u1");
    app.storage.set_offline(true);

    let response = app
        .router
        .oneshot(multipart_request(
            &token,
            &[("name", "Ada")],
            Some(TestImage {
                content_type: "image/png",
                body: vec![1],
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(app.db.get_user("u1").await.unwrap().is_none());
}
