// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! FitSplit tracker: a five-day workout split with attendance streaks.
//!
//! This crate provides the backend API (sign-up/login, the workout split,
//! per-user attendance summaries, profile editing) and a typed client for it.

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod storage;
pub mod time_utils;

use config::Config;
use db::Store;
use models::CompletionRules;
use services::{AttendanceTracker, IdentityService, ProfileEditor, WorkoutCatalog};
use std::sync::Arc;
use storage::ObjectStore;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Arc<dyn Store>,
    pub storage: Arc<dyn ObjectStore>,
    pub identity: IdentityService,
    pub tracker: AttendanceTracker,
    pub catalog: WorkoutCatalog,
    pub profiles: ProfileEditor,
}

impl AppState {
    /// Wire the services on top of the given backends.
    pub fn new(config: Config, db: Arc<dyn Store>, storage: Arc<dyn ObjectStore>) -> Self {
        let identity = IdentityService::new(db.clone(), config.jwt_signing_key.clone());
        let tracker = AttendanceTracker::new(
            db.clone(),
            CompletionRules {
                streak: config.streak_policy,
                rollover: config.set_total_rollover,
            },
        );
        let catalog = WorkoutCatalog::new(db.clone());
        let profiles = ProfileEditor::new(identity.clone(), storage.clone(), config.max_image_bytes);

        Self {
            config,
            db,
            storage,
            identity,
            tracker,
            catalog,
            profiles,
        }
    }
}
