// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Attendance/streak tracking.
//!
//! Each user has one summary document. Reads and writes are plain
//! read-modify-write with no transaction: two clients completing workouts
//! for the same user at the same moment race, and the last write wins.

use crate::db::Store;
use crate::error::AppError;
use crate::models::{AttendanceSummary, CompletionRules};
use chrono::NaiveDate;
use std::sync::Arc;

/// Owns the per-user attendance summary and its update rule.
#[derive(Clone)]
pub struct AttendanceTracker {
    db: Arc<dyn Store>,
    rules: CompletionRules,
}

impl AttendanceTracker {
    pub fn new(db: Arc<dyn Store>, rules: CompletionRules) -> Self {
        Self { db, rules }
    }

    /// Read the user's summary, creating it with defaults on first use.
    pub async fn load_summary(&self, uid: &str) -> Result<AttendanceSummary, AppError> {
        if let Some(summary) = self.db.get_attendance_summary(uid).await? {
            return Ok(summary);
        }

        let summary = AttendanceSummary::default();
        self.db.set_attendance_summary(uid, &summary).await?;
        tracing::info!(uid, "Created attendance summary");

        Ok(summary)
    }

    /// Record a completed workout of `sets` sets on `today`.
    ///
    /// A second completion on the same day returns the stored summary
    /// without writing.
    pub async fn record_completion(
        &self,
        uid: &str,
        sets: u32,
        today: NaiveDate,
    ) -> Result<AttendanceSummary, AppError> {
        let mut summary = self
            .db
            .get_attendance_summary(uid)
            .await?
            .unwrap_or_default();

        if !summary.record_completion(sets, today, self.rules) {
            tracing::debug!(uid, %today, "Workout already recorded today (no-op)");
            return Ok(summary);
        }

        self.db.set_attendance_summary(uid, &summary).await?;

        tracing::info!(
            uid,
            %today,
            sets,
            streak = summary.streak,
            total_sets = summary.total_sets_this_month,
            "Workout completion recorded"
        );

        Ok(summary)
    }
}
