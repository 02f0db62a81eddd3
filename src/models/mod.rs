// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod attendance;
pub mod user;
pub mod workout;

pub use attendance::{AttendanceSummary, CompletionRules, SetTotalRollover, StreakPolicy};
pub use user::{Account, ProfileUpdate, User};
pub use workout::{Exercise, SplitDay, WorkoutDay, WorkoutSplit};
