// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Headless dashboard model.

use super::{ApiClient, ClientError, Result};
use crate::models::{AttendanceSummary, WorkoutDay};
use crate::routes::api::DashboardResponse;

/// Workout list and attendance summary as shown on the dashboard.
///
/// Completion flags are local: the server only keeps the aggregate summary,
/// so a freshly loaded view starts with every day unchecked.
#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    days: Vec<WorkoutDay>,
    summary: AttendanceSummary,
    attended_today: bool,
}

impl From<DashboardResponse> for DashboardView {
    fn from(resp: DashboardResponse) -> Self {
        Self {
            days: resp.days,
            summary: resp.summary,
            attended_today: resp.attended_today,
        }
    }
}

impl DashboardView {
    /// Fetch the dashboard, optionally filtered by focus.
    pub async fn load(client: &ApiClient, focus: Option<&str>) -> Result<Self> {
        Ok(client.dashboard(focus).await?.into())
    }

    pub fn days(&self) -> &[WorkoutDay] {
        &self.days
    }

    pub fn summary(&self) -> &AttendanceSummary {
        &self.summary
    }

    pub fn attended_today(&self) -> bool {
        self.attended_today
    }

    /// Completed days and total days.
    pub fn progress(&self) -> (usize, usize) {
        let done = self.days.iter().filter(|d| d.completed).count();
        (done, self.days.len())
    }

    /// Mark a day complete locally and on the server.
    ///
    /// The flag is set before the request goes out. If the request fails the
    /// flag goes back to what it was and the error is returned.
    pub async fn complete(
        &mut self,
        client: &ApiClient,
        day_id: &str,
    ) -> Result<&AttendanceSummary> {
        let idx = self
            .days
            .iter()
            .position(|d| d.id == day_id)
            .ok_or_else(|| ClientError::UnknownWorkout(day_id.to_string()))?;

        let previous = std::mem::replace(&mut self.days[idx].completed, true);

        match client.complete_workout(day_id).await {
            Ok(resp) => {
                self.summary = resp.summary;
                self.attended_today = true;
                Ok(&self.summary)
            }
            Err(e) => {
                tracing::warn!(day_id, error = %e, "Workout completion failed, reverting");
                self.days[idx].completed = previous;
                Err(e)
            }
        }
    }
}
