// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout split reference data and its display shape.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Document id of the shared default split.
pub const DEFAULT_SPLIT_ID: &str = "fiveDaySplit";

/// Stored workout split.
///
/// Stored at: `workouts/{split_id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSplit {
    #[serde(default)]
    pub days: Vec<SplitDay>,
}

/// One day of a stored split. Every field is optional in storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SplitDay {
    /// Label such as "Monday"
    #[serde(default)]
    pub day: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    /// Muscle-group tag, e.g. "Chest & Triceps"
    #[serde(default)]
    pub focus: Option<String>,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Exercise {
    pub name: String,
    /// Rep scheme, e.g. "4x8-10"
    #[serde(default)]
    pub reps: String,
}

/// A split day shaped for the dashboard list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WorkoutDay {
    /// Zero-based position in the split
    pub id: String,
    pub day: String,
    pub title: String,
    pub focus: String,
    pub exercises: Vec<Exercise>,
    pub completed: bool,
}

impl WorkoutDay {
    /// Sets credited when this day is completed (one per exercise).
    pub fn set_count(&self) -> u32 {
        u32::try_from(self.exercises.len()).unwrap_or(u32::MAX)
    }
}

impl WorkoutSplit {
    /// Shape stored days into the display list, filling in defaults.
    pub fn to_display_days(&self) -> Vec<WorkoutDay> {
        self.days
            .iter()
            .enumerate()
            .map(|(idx, day)| WorkoutDay {
                id: idx.to_string(),
                day: day
                    .day
                    .clone()
                    .filter(|d| !d.is_empty())
                    .unwrap_or_else(|| format!("Day {}", idx + 1)),
                title: day.title.clone().unwrap_or_default(),
                focus: day.focus.clone().unwrap_or_default(),
                exercises: day.exercises.clone(),
                completed: false,
            })
            .collect()
    }
}

/// Keep days whose focus contains `focus`, ignoring case. "all" keeps everything.
pub fn filter_by_focus(days: Vec<WorkoutDay>, focus: Option<&str>) -> Vec<WorkoutDay> {
    let needle = match focus.map(str::trim) {
        None | Some("") => return days,
        Some(f) if f.eq_ignore_ascii_case("all") => return days,
        Some(f) => f.to_lowercase(),
    };

    days.into_iter()
        .filter(|d| d.focus.to_lowercase().contains(&needle))
        .collect()
}
