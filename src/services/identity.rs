// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Email/password identity and user records.
//!
//! Handles:
//! - Account creation and credential checks (argon2 hashes)
//! - Session token issuance
//! - Reading and merging the user profile record

use crate::db::Store;
use crate::error::AppError;
use crate::middleware::auth::create_jwt;
use crate::models::user::normalize_email;
use crate::models::{Account, ProfileUpdate, User};
use crate::time_utils::now_rfc3339;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

/// Signup/login request body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Credentials {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Result of a successful signup or login.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Identity provider and user record access.
#[derive(Clone)]
pub struct IdentityService {
    db: Arc<dyn Store>,
    signing_key: Arc<Vec<u8>>,
}

impl IdentityService {
    pub fn new(db: Arc<dyn Store>, signing_key: Vec<u8>) -> Self {
        Self {
            db,
            signing_key: Arc::new(signing_key),
        }
    }

    /// Create an account and its user record, then start a session.
    pub async fn signup(&self, credentials: Credentials) -> Result<Session, AppError> {
        let credentials = Credentials {
            email: normalize_email(&credentials.email),
            password: credentials.password,
        };
        credentials.validate()?;
        let email = credentials.email.clone();

        if self.db.get_account(&email).await?.is_some() {
            return Err(AppError::Conflict(format!("Account {} already exists", email)));
        }

        let password_hash = hash_password(credentials.password).await?;
        let now = now_rfc3339();
        let uid = uuid::Uuid::new_v4().simple().to_string();

        self.db
            .create_account(&Account {
                uid: uid.clone(),
                email: email.clone(),
                password_hash,
                created_at: now.clone(),
            })
            .await?;

        let user = User {
            uid: uid.clone(),
            email: email.clone(),
            created_at: Some(now),
            ..Default::default()
        };
        self.db.upsert_user(&user).await?;

        tracing::info!(uid = %uid, "Account created");

        Ok(Session {
            token: self.issue_token(&uid, &email)?,
            user,
        })
    }

    /// Check credentials and start a session.
    ///
    /// Unknown email and wrong password fail the same way.
    pub async fn login(&self, credentials: Credentials) -> Result<Session, AppError> {
        let email = normalize_email(&credentials.email);

        let account = self
            .db
            .get_account(&email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(credentials.password, account.password_hash.clone()).await? {
            tracing::info!(uid = %account.uid, "Login rejected: wrong password");
            return Err(AppError::InvalidCredentials);
        }

        let user = self.current_user(&account.uid, &account.email).await?;
        tracing::info!(uid = %account.uid, "Login successful");

        Ok(Session {
            token: self.issue_token(&account.uid, &account.email)?,
            user,
        })
    }

    /// The stored user record, or the bare identity if none exists yet.
    pub async fn current_user(&self, uid: &str, email: &str) -> Result<User, AppError> {
        Ok(self.db.get_user(uid).await?.unwrap_or_else(|| User {
            uid: uid.to_string(),
            email: email.to_string(),
            ..Default::default()
        }))
    }

    /// Merge `update` into the stored user record.
    pub async fn update_profile(
        &self,
        uid: &str,
        email: &str,
        update: ProfileUpdate,
    ) -> Result<User, AppError> {
        let mut user = self.current_user(uid, email).await?;
        user.merge(update, &now_rfc3339());
        self.db.upsert_user(&user).await?;

        tracing::info!(uid, "Profile updated");
        Ok(user)
    }

    fn issue_token(&self, uid: &str, email: &str) -> Result<String, AppError> {
        create_jwt(uid, email, &self.signing_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))
    }
}

/// Hash a password off the async runtime.
async fn hash_password(plain: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(plain.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| anyhow::anyhow!("argon2 hash_password error: {}", e))
    })
    .await
    .map_err(|e| AppError::Internal(e.into()))?
    .map_err(AppError::Internal)
}

/// Verify a password against a stored PHC string off the async runtime.
async fn verify_password(plain: String, hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&hash)
            .map_err(|e| anyhow::anyhow!("argon2 parse hash error: {}", e))?;
        Ok::<_, anyhow::Error>(
            Argon2::default()
                .verify_password(plain.as_bytes(), &parsed)
                .is_ok(),
        )
    })
    .await
    .map_err(|e| AppError::Internal(e.into()))?
    .map_err(AppError::Internal)
}
