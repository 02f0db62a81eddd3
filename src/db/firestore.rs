// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profile storage)
//! - Accounts (email/password credentials)
//! - Workout stats (attendance summaries)
//! - Workouts (shared split documents)

use crate::db::{account_doc_id, collections, Store};
use crate::error::AppError;
use crate::models::{Account, AttendanceSummary, User, WorkoutSplit};
use async_trait::async_trait;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: firestore::FirestoreDb,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // The emulator accepts any token, so skip credential discovery.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self { client })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self { client })
    }
}

#[async_trait]
impl Store for FirestoreDb {
    // ─── User Operations ─────────────────────────────────────────

    async fn get_user(&self, uid: &str) -> Result<Option<User>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(uid)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.uid)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Account Operations ──────────────────────────────────────

    async fn get_account(&self, email: &str) -> Result<Option<Account>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::ACCOUNTS)
            .obj()
            .one(&account_doc_id(email))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn create_account(&self, account: &Account) -> Result<(), AppError> {
        // Insert (not update) so Firestore rejects a second account for the same email.
        let result: Result<Account, _> = self
            .client
            .fluent()
            .insert()
            .into(collections::ACCOUNTS)
            .document_id(account_doc_id(&account.email))
            .object(account)
            .execute()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(firestore::errors::FirestoreError::DataConflictError(_)) => Err(
                AppError::Conflict(format!("Account {} already exists", account.email)),
            ),
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    // ─── Attendance Operations ───────────────────────────────────

    async fn get_attendance_summary(
        &self,
        uid: &str,
    ) -> Result<Option<AttendanceSummary>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::WORKOUT_STATS)
            .obj()
            .one(uid)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn set_attendance_summary(
        &self,
        uid: &str,
        summary: &AttendanceSummary,
    ) -> Result<(), AppError> {
        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collections::WORKOUT_STATS)
            .document_id(uid)
            .object(summary)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Workout Split Operations ────────────────────────────────

    async fn get_workout_split(&self, split_id: &str) -> Result<Option<WorkoutSplit>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::WORKOUTS)
            .obj()
            .one(split_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn set_workout_split(
        &self,
        split_id: &str,
        split: &WorkoutSplit,
    ) -> Result<(), AppError> {
        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collections::WORKOUTS)
            .document_id(split_id)
            .object(split)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
