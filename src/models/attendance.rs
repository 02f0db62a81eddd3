// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-user attendance aggregate and its completion rule.
//!
//! The summary is a singleton per user. A completion on a calendar day the
//! summary has already recorded is a no-op, so at most one update lands per
//! user per day.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Calendar-day format used for `last_updated` ("YYYY-MM-DD").
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Attendance aggregate for one user.
///
/// Stored at: `workout_stats/{uid}`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AttendanceSummary {
    /// Whether any workout has been recorded
    #[serde(default)]
    pub attended: bool,
    /// Days with a recorded workout, per the active streak policy
    #[serde(default)]
    pub streak: u32,
    /// Calendar day of the last recorded workout
    #[serde(default, alias = "lastUpdated")]
    pub last_updated: Option<String>,
    /// Sets accumulated by recorded workouts
    #[serde(default, alias = "totalSetsThisMonth")]
    pub total_sets_this_month: u32,
}

/// How the streak reacts to a gap between recorded days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreakPolicy {
    /// Every new day adds one, however long the gap.
    #[default]
    IncrementAlways,
    /// Only the day after `last_updated` extends the streak; any other day
    /// starts a new streak of 1.
    ConsecutiveDays,
}

impl FromStr for StreakPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "increment" => Ok(StreakPolicy::IncrementAlways),
            "consecutive" => Ok(StreakPolicy::ConsecutiveDays),
            other => Err(format!("unknown streak policy: {other}")),
        }
    }
}

/// Whether `total_sets_this_month` resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetTotalRollover {
    /// The total only ever grows.
    #[default]
    Never,
    /// The first completion in a new calendar month restarts the total.
    CalendarMonth,
}

impl FromStr for SetTotalRollover {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "never" => Ok(SetTotalRollover::Never),
            "month" => Ok(SetTotalRollover::CalendarMonth),
            other => Err(format!("unknown set total rollover: {other}")),
        }
    }
}

/// Rules applied when a completion is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompletionRules {
    pub streak: StreakPolicy,
    pub rollover: SetTotalRollover,
}

/// Format a calendar day the way it is stored.
pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

/// Parse a stored calendar day.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, DAY_FORMAT).ok()
}

impl AttendanceSummary {
    /// Whether a workout has already been recorded on `today`.
    pub fn attended_on(&self, today: NaiveDate) -> bool {
        self.last_updated.as_deref() == Some(format_day(today).as_str())
    }

    /// Apply a completion of `sets` sets on `today`.
    ///
    /// Returns `true` if the summary changed, `false` for a same-day repeat.
    pub fn record_completion(&mut self, sets: u32, today: NaiveDate, rules: CompletionRules) -> bool {
        if self.attended_on(today) {
            return false;
        }

        let previous = self.last_updated.as_deref().and_then(parse_day);

        self.streak = match (rules.streak, previous) {
            (StreakPolicy::IncrementAlways, _) => self.streak.saturating_add(1),
            (StreakPolicy::ConsecutiveDays, Some(prev)) if prev.succ_opt() == Some(today) => {
                self.streak.saturating_add(1)
            }
            (StreakPolicy::ConsecutiveDays, _) => 1,
        };

        let new_month = match previous {
            Some(prev) => (prev.year(), prev.month()) != (today.year(), today.month()),
            None => false,
        };
        if rules.rollover == SetTotalRollover::CalendarMonth && new_month {
            self.total_sets_this_month = 0;
        }

        self.total_sets_this_month = self.total_sets_this_month.saturating_add(sets);
        self.last_updated = Some(format_day(today));
        self.attended = true;
        true
    }
}
