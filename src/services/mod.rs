// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod attendance;
pub mod catalog;
pub mod identity;
pub mod profile;

pub use attendance::AttendanceTracker;
pub use catalog::WorkoutCatalog;
pub use identity::{Credentials, IdentityService, Session};
pub use profile::{ImageUpload, ProfileEditor, ProfileFields};
