// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (document store).
//!
//! Every record is addressed by id; there are no queries. [`FirestoreDb`]
//! is the production backend, [`MemoryDb`] keeps documents in process.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryDb;

use crate::error::AppError;
use crate::models::{Account, AttendanceSummary, User, WorkoutSplit};
use async_trait::async_trait;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Email/password credentials (keyed by normalized email)
    pub const ACCOUNTS: &str = "accounts";
    /// Attendance summaries (keyed by uid)
    pub const WORKOUT_STATS: &str = "workout_stats";
    /// Shared workout splits
    pub const WORKOUTS: &str = "workouts";
}

/// Typed document operations used by the services.
#[async_trait]
pub trait Store: Send + Sync {
    // ─── Users ───────────────────────────────────────────────────

    async fn get_user(&self, uid: &str) -> Result<Option<User>, AppError>;

    /// Write the full user record.
    async fn upsert_user(&self, user: &User) -> Result<(), AppError>;

    // ─── Accounts ────────────────────────────────────────────────

    async fn get_account(&self, email: &str) -> Result<Option<Account>, AppError>;

    /// Create an account; fails with [`AppError::Conflict`] if the email is taken.
    async fn create_account(&self, account: &Account) -> Result<(), AppError>;

    // ─── Attendance ──────────────────────────────────────────────

    async fn get_attendance_summary(&self, uid: &str)
        -> Result<Option<AttendanceSummary>, AppError>;

    async fn set_attendance_summary(
        &self,
        uid: &str,
        summary: &AttendanceSummary,
    ) -> Result<(), AppError>;

    // ─── Workout Splits ──────────────────────────────────────────

    async fn get_workout_split(&self, split_id: &str) -> Result<Option<WorkoutSplit>, AppError>;

    async fn set_workout_split(&self, split_id: &str, split: &WorkoutSplit)
        -> Result<(), AppError>;
}

/// Document id for an account. Emails may contain characters that are not
/// valid in a document id.
pub fn account_doc_id(email: &str) -> String {
    urlencoding::encode(email).into_owned()
}
