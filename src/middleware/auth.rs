// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session tokens and the authentication middleware.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Name of the session cookie.
pub const TOKEN_COOKIE: &str = "fitsplit_token";

/// Session lifetime in days.
pub const SESSION_DAYS: i64 = 30;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// The signed-in user, inserted as a request extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
}

/// Pull the session token from the cookie or an `Authorization: Bearer` header.
fn extract_token(jar: &CookieJar, request: &Request) -> Option<String> {
    if let Some(cookie) = jar.get(TOKEN_COOKIE) {
        return Some(cookie.value().to_string());
    }

    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Decode and verify a session token.
pub fn verify_jwt(token: &str, signing_key: &[u8]) -> Option<AuthUser> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    let claims = decode::<Claims>(token, &key, &validation).ok()?.claims;
    if claims.sub.is_empty() {
        return None;
    }

    Some(AuthUser {
        uid: claims.sub,
        email: claims.email,
    })
}

/// Middleware that requires a valid session.
///
/// No token at all is `unauthorized`; a token that fails verification is
/// `invalid_token`. Both are 401.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(&jar, &request).ok_or(AppError::Unauthorized)?;

    let auth_user =
        verify_jwt(&token, &state.config.jwt_signing_key).ok_or(AppError::InvalidToken)?;

    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Create a JWT for a user session.
pub fn create_jwt(uid: &str, email: &str, signing_key: &[u8]) -> anyhow::Result<String> {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: uid.to_string(),
        email: email.to_string(),
        iat: now,
        exp: now + SESSION_DAYS as usize * 24 * 60 * 60,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}
