// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout catalog: the shared, read-only workout split.

use crate::db::Store;
use crate::error::AppError;
use crate::models::workout::DEFAULT_SPLIT_ID;
use crate::models::{WorkoutDay, WorkoutSplit};
use std::sync::Arc;

/// Bundled default five-day split, written by the `seed-split` binary.
const DEFAULT_SPLIT_JSON: &str = include_str!("../../data/five_day_split.json");

/// Loads the default split and shapes it for display.
#[derive(Clone)]
pub struct WorkoutCatalog {
    db: Arc<dyn Store>,
}

impl WorkoutCatalog {
    pub fn new(db: Arc<dyn Store>) -> Self {
        Self { db }
    }

    /// Load the default split as a display list.
    ///
    /// A missing split document yields an empty list.
    pub async fn load_default_split(&self) -> Result<Vec<WorkoutDay>, AppError> {
        let split = self.db.get_workout_split(DEFAULT_SPLIT_ID).await?;

        match split {
            Some(split) => Ok(split.to_display_days()),
            None => {
                tracing::warn!(split_id = DEFAULT_SPLIT_ID, "Workout split not found");
                Ok(Vec::new())
            }
        }
    }

    /// Find one day of the default split by its display id.
    pub async fn find_day(&self, day_id: &str) -> Result<Option<WorkoutDay>, AppError> {
        Ok(self
            .load_default_split()
            .await?
            .into_iter()
            .find(|d| d.id == day_id))
    }

    /// Write the bundled default split to the store. Returns the day count.
    pub async fn seed_default_split(&self) -> Result<usize, AppError> {
        let split = bundled_default_split()?;
        self.db.set_workout_split(DEFAULT_SPLIT_ID, &split).await?;

        tracing::info!(
            split_id = DEFAULT_SPLIT_ID,
            days = split.days.len(),
            "Seeded default workout split"
        );
        Ok(split.days.len())
    }
}

/// Parse the bundled default split.
pub fn bundled_default_split() -> Result<WorkoutSplit, AppError> {
    serde_json::from_str(DEFAULT_SPLIT_JSON).map_err(|e| {
        AppError::Internal(anyhow::anyhow!("Bundled workout split is invalid: {}", e))
    })
}
