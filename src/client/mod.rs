// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Typed HTTP client for the FitSplit API.
//!
//! [`ApiClient`] wraps every route. Identity operations keep the shared
//! [`SessionState`] in step with the server; [`DashboardView`] is the
//! headless dashboard model built on top.

pub mod dashboard;
pub mod session;

pub use dashboard::DashboardView;
pub use session::{ClientSession, SessionState};

use crate::models::{User, WorkoutDay};
use crate::routes::api::{CompletionResponse, DashboardResponse, ProfileResponse};
use crate::routes::auth::{AuthResponse, LogoutResponse};
use crate::routes::HealthResponse;
use bytes::Bytes;
use reqwest::{multipart, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Client-side failures.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error body.
    #[error("{status}: {error}")]
    Api {
        status: StatusCode,
        error: String,
        details: Option<String>,
    },

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Unknown workout: {0}")]
    UnknownWorkout(String),
}

impl ClientError {
    /// Short text suitable for a notification.
    pub fn message(&self) -> String {
        match self {
            ClientError::Api {
                details: Some(d), ..
            } => d.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Deserialize)]
struct ApiErrorBody {
    error: String,
    #[serde(default)]
    details: Option<String>,
}

#[derive(Serialize)]
struct CredentialsBody<'a> {
    email: &'a str,
    password: &'a str,
}

/// A new profile image to upload.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub body: Bytes,
    pub content_type: String,
    pub file_name: String,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionState,
}

impl ApiClient {
    /// Client with a fresh, signed-out session.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_session(base_url, SessionState::new())
    }

    /// Client writing to an existing session slot.
    pub fn with_session(base_url: impl Into<String>, session: SessionState) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.session.token().ok_or(ClientError::NotSignedIn)?;
        Ok(req.bearer_auth(token))
    }

    // ─── Identity ────────────────────────────────────────────────

    pub async fn signup(&self, email: &str, password: &str) -> Result<AuthResponse> {
        self.start_session("/auth/signup", email, password).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        self.start_session("/auth/login", email, password).await
    }

    async fn start_session(
        &self,
        path: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse> {
        let resp = self
            .http
            .post(self.url(path))
            .json(&CredentialsBody { email, password })
            .send()
            .await?;
        let auth: AuthResponse = parse_json(resp).await?;

        tracing::debug!(uid = %auth.user.uid, "Signed in");
        self.session.set(ClientSession {
            user: auth.user.clone(),
            token: auth.token.clone(),
        });
        Ok(auth)
    }

    /// Sign out. The local session is cleared even if the server is unreachable.
    pub async fn logout(&self) -> Result<LogoutResponse> {
        self.session.clear();
        let resp = self.http.post(self.url("/auth/logout")).send().await?;
        parse_json(resp).await
    }

    /// Re-read the signed-in user's record from the server.
    pub async fn refresh(&self) -> Result<User> {
        let resp = self.authed(self.http.get(self.url("/api/me")))?.send().await?;
        let user: User = parse_json(resp).await?;
        self.session.set_user(user.clone());
        Ok(user)
    }

    // ─── Profile ─────────────────────────────────────────────────

    pub async fn save_profile(
        &self,
        name: &str,
        bio: &str,
        image: Option<ImageFile>,
    ) -> Result<ProfileResponse> {
        let mut form = multipart::Form::new()
            .text("name", name.to_string())
            .text("bio", bio.to_string());

        if let Some(image) = image {
            let part = multipart::Part::bytes(image.body.to_vec())
                .file_name(image.file_name)
                .mime_str(&image.content_type)?;
            form = form.part("image", part);
        }

        let resp = self
            .authed(self.http.put(self.url("/api/profile")))?
            .multipart(form)
            .send()
            .await?;
        let saved: ProfileResponse = parse_json(resp).await?;
        self.session.set_user(saved.user.clone());
        Ok(saved)
    }

    pub async fn delete_profile_image(&self) -> Result<ProfileResponse> {
        let resp = self
            .authed(self.http.delete(self.url("/api/profile/image")))?
            .send()
            .await?;
        let saved: ProfileResponse = parse_json(resp).await?;
        self.session.set_user(saved.user.clone());
        Ok(saved)
    }

    // ─── Workouts ────────────────────────────────────────────────

    pub async fn dashboard(&self, focus: Option<&str>) -> Result<DashboardResponse> {
        let mut req = self.authed(self.http.get(self.url("/api/dashboard")))?;
        if let Some(focus) = focus {
            req = req.query(&[("focus", focus)]);
        }
        parse_json(req.send().await?).await
    }

    pub async fn workouts(&self, focus: Option<&str>) -> Result<Vec<WorkoutDay>> {
        let mut req = self.authed(self.http.get(self.url("/api/workouts")))?;
        if let Some(focus) = focus {
            req = req.query(&[("focus", focus)]);
        }
        parse_json(req.send().await?).await
    }

    pub async fn complete_workout(&self, day_id: &str) -> Result<CompletionResponse> {
        let path = format!("/api/workouts/{}/complete", urlencoding::encode(day_id));
        let resp = self
            .authed(self.http.post(self.url(&path)))?
            .send()
            .await?;
        parse_json(resp).await
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        parse_json(self.http.get(self.url("/health")).send().await?).await
    }
}

/// Decode a success body, or turn an error body into [`ClientError::Api`].
async fn parse_json<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json().await?);
    }

    let text = resp.text().await.unwrap_or_default();
    let (error, details) = match serde_json::from_str::<ApiErrorBody>(&text) {
        Ok(body) => (body.error, body.details),
        Err(_) => (status.to_string(), None),
    };

    tracing::debug!(%status, error = %error, "API request failed");
    Err(ClientError::Api {
        status,
        error,
        details,
    })
}
