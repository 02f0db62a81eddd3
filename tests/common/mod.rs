// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, Response};
use fitsplit_tracker::config::Config;
use fitsplit_tracker::db::{FirestoreDb, MemoryDb};
use fitsplit_tracker::middleware::auth::create_jwt;
use fitsplit_tracker::routes::create_router;
use fitsplit_tracker::storage::MemoryObjectStore;
use fitsplit_tracker::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Connect to the Firestore emulator.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Router over in-memory backends, with handles to poke at them.
#[allow(dead_code)]
pub struct TestApp {
    pub router: axum::Router,
    pub state: Arc<AppState>,
    pub db: Arc<MemoryDb>,
    pub storage: Arc<MemoryObjectStore>,
}

/// Create a test app with in-memory backends and no workout split.
#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    create_test_app_with_config(Config::test_default())
}

#[allow(dead_code)]
pub fn create_test_app_with_config(config: Config) -> TestApp {
    let db = Arc::new(MemoryDb::new());
    let storage = Arc::new(MemoryObjectStore::new());
    let state = Arc::new(AppState::new(config, db.clone(), storage.clone()));

    TestApp {
        router: create_router(state.clone()),
        state,
        db,
        storage,
    }
}

/// Create a test app with the bundled split already seeded.
#[allow(dead_code)]
pub async fn create_seeded_app() -> TestApp {
    let app = create_test_app();
    app.state
        .catalog
        .seed_default_split()
        .await
        .expect("seeding split into memory store");
    app
}

/// Session token for `uid` signed with the test key.
#[allow(dead_code)]
pub fn create_test_jwt(uid: &str) -> String {
    create_jwt(
        uid,
        &format!("{}@example.com", uid),
        &Config::test_default().jwt_signing_key,
    )
    .unwrap()
}

/// Build a request with a bearer token.
#[allow(dead_code)]
pub fn authed(method: &str, uri: &str, token: &str) -> axum::http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
}

/// JSON request with no auth.
#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Serve the router on an ephemeral port. Returns the base URL.
#[allow(dead_code)]
pub async fn spawn_server(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

const BOUNDARY: &str = "fitsplit-test-boundary";

/// An image part for [`multipart_request`].
#[allow(dead_code)]
pub struct TestImage<'a> {
    pub content_type: &'a str,
    pub body: Vec<u8>,
}

/// Build a `PUT /api/profile` multipart request.
#[allow(dead_code)]
pub fn multipart_request(
    token: &str,
    fields: &[(&str, &str)],
    image: Option<TestImage<'_>>,
) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(image) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"avatar\"\r\nContent-Type: {}\r\n\r\n",
                image.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(&image.body);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    authed("PUT", "/api/profile", token)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}
