// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::workout::filter_by_focus;
use crate::models::{AttendanceSummary, User, WorkoutDay};
use crate::services::{ImageUpload, ProfileFields};
use crate::time_utils::today_utc;
use crate::AppState;
use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Request body cap for profile saves. Larger than the image limit so an
/// oversized image reaches validation and gets a readable error.
const PROFILE_BODY_LIMIT: usize = 16 * 1024 * 1024;

/// API routes, nested under `/api` in routes/mod.rs.
///
/// The auth middleware wraps this whole router, fallback included, so an
/// unknown `/api` path is still 401 without a session.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/me", get(get_me))
        .route(
            "/profile",
            put(save_profile).layer(DefaultBodyLimit::max(PROFILE_BODY_LIMIT)),
        )
        .route("/profile/image", delete(delete_profile_image))
        .route("/dashboard", get(get_dashboard))
        .route("/workouts", get(get_workouts))
        .route("/workouts/{day_id}/complete", post(complete_workout))
        .fallback(super::not_found)
}

// ─── User Profile ────────────────────────────────────────────

/// A user record plus a notification message.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProfileResponse {
    pub user: User,
    pub message: String,
}

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<User>> {
    Ok(Json(
        state.identity.current_user(&user.uid, &user.email).await?,
    ))
}

/// Save name, bio and an optional new image (multipart form).
async fn save_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<Json<ProfileResponse>> {
    let mut fields = ProfileFields::default();
    let mut image = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("name") => fields.name = Some(field.text().await.map_err(bad_multipart)?),
            Some("bio") => fields.bio = Some(field.text().await.map_err(bad_multipart)?),
            Some("image") => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let body = field.bytes().await.map_err(bad_multipart)?;
                // Browsers send an empty part when no file was chosen
                if !body.is_empty() {
                    image = Some(ImageUpload { body, content_type });
                }
            }
            other => {
                tracing::debug!(field = ?other, "Ignoring unknown profile form field");
            }
        }
    }

    let updated = state
        .profiles
        .save_profile(&user.uid, &user.email, fields, image)
        .await?;

    Ok(Json(ProfileResponse {
        user: updated,
        message: "Profile updated".to_string(),
    }))
}

fn bad_multipart(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::BadRequest(format!("Malformed form data: {}", e))
}

async fn delete_profile_image(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProfileResponse>> {
    let updated = state.profiles.delete_image(&user.uid, &user.email).await?;

    Ok(Json(ProfileResponse {
        user: updated,
        message: "Profile image removed".to_string(),
    }))
}

// ─── Workouts ────────────────────────────────────────────────

#[derive(Deserialize)]
struct FocusQuery {
    /// Case-insensitive focus filter; "all" or absent keeps every day
    focus: Option<String>,
}

/// Dashboard payload: the split and the user's attendance summary.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DashboardResponse {
    pub days: Vec<WorkoutDay>,
    pub summary: AttendanceSummary,
    /// A workout has already been recorded today
    pub attended_today: bool,
}

async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<FocusQuery>,
) -> Result<Json<DashboardResponse>> {
    let days = state.catalog.load_default_split().await?;
    let summary = state.tracker.load_summary(&user.uid).await?;

    Ok(Json(DashboardResponse {
        days: filter_by_focus(days, query.focus.as_deref()),
        attended_today: summary.attended_on(today_utc()),
        summary,
    }))
}

async fn get_workouts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FocusQuery>,
) -> Result<Json<Vec<WorkoutDay>>> {
    let days = state.catalog.load_default_split().await?;
    Ok(Json(filter_by_focus(days, query.focus.as_deref())))
}

#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CompletionResponse {
    pub summary: AttendanceSummary,
    pub message: String,
}

/// Mark one day of the split as completed today.
///
/// Credits one set per exercise of that day. Completing again on the same
/// day changes nothing.
async fn complete_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(day_id): Path<String>,
) -> Result<Json<CompletionResponse>> {
    if day_id.parse::<usize>().is_err() {
        return Err(AppError::BadRequest(format!("Invalid workout id: {}", day_id)));
    }

    let day = state
        .catalog
        .find_day(&day_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Workout {} not found", day_id)))?;

    let summary = state
        .tracker
        .record_completion(&user.uid, day.set_count(), today_utc())
        .await?;

    Ok(Json(CompletionResponse {
        summary,
        message: "Workout marked as completed!".to_string(),
    }))
}
