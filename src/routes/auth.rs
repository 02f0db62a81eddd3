// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Email/password authentication routes.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::Result;
use crate::middleware::auth::{SESSION_DAYS, TOKEN_COOKIE};
use crate::models::User;
use crate::services::{Credentials, Session};
use crate::AppState;

/// Where the client should go after signing in.
pub const AFTER_LOGIN: &str = "/dashboard";
/// Where the client should go after signing out.
pub const AFTER_LOGOUT: &str = "/auth/login";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

/// Successful signup/login.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AuthResponse {
    pub user: User,
    /// Session token, also set as the session cookie
    pub token: String,
    pub message: String,
    pub redirect_to: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LogoutResponse {
    pub message: String,
    pub redirect_to: String,
}

/// Build the session cookie. Plain-http frontends (local dev) get a
/// non-secure cookie.
fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(SESSION_DAYS))
        .secure(!state.config.frontend_url.starts_with("http://"))
        .build()
}

fn session_response(
    state: &AppState,
    jar: CookieJar,
    session: Session,
    message: &str,
) -> (CookieJar, Json<AuthResponse>) {
    let jar = jar.add(session_cookie(state, session.token.clone()));
    (
        jar,
        Json(AuthResponse {
            user: session.user,
            token: session.token,
            message: message.to_string(),
            redirect_to: AFTER_LOGIN.to_string(),
        }),
    )
}

/// Create an account and sign in.
async fn signup(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(credentials): Json<Credentials>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>)> {
    let session = state.identity.signup(credentials).await?;
    let (jar, body) = session_response(&state, jar, session, "Account created");
    Ok((StatusCode::CREATED, jar, body))
}

async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(credentials): Json<Credentials>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    let session = state.identity.login(credentials).await?;
    Ok(session_response(&state, jar, session, "Logged in"))
}

/// Clear the session cookie. Always succeeds.
async fn logout(jar: CookieJar) -> (CookieJar, Json<LogoutResponse>) {
    let jar = jar.remove(Cookie::build(TOKEN_COOKIE).path("/"));
    (
        jar,
        Json(LogoutResponse {
            message: "Logged out".to_string(),
            redirect_to: AFTER_LOGOUT.to_string(),
        }),
    )
}
