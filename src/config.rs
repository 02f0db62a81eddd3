// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Secrets (the JWT signing key) are injected as environment variables by
//! the deployment and read once at startup.

use crate::models::attendance::{SetTotalRollover, StreakPolicy};
use std::env;

/// Default upper bound for profile images (2 MiB).
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

/// Which backends hold documents and objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Firestore + Cloud Storage
    Gcp,
    /// Process-local maps, lost on restart (local development)
    Memory,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// GCP project ID
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// Document/object store backend
    pub storage_backend: StorageBackend,
    /// Cloud Storage bucket for profile images
    pub storage_bucket: String,
    /// Largest accepted profile image in bytes
    pub max_image_bytes: usize,
    /// How the streak reacts to a gap between workouts
    pub streak_policy: StreakPolicy,
    /// Whether the monthly set total resets
    pub set_total_rollover: SetTotalRollover,

    // --- Secrets ---
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:3000".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            storage_backend: StorageBackend::Memory,
            storage_bucket: "test-bucket".to_string(),
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            streak_policy: StreakPolicy::default(),
            set_total_rollover: SetTotalRollover::default(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honored for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let storage_backend = match env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "gcp".to_string())
            .trim()
        {
            "gcp" => StorageBackend::Gcp,
            "memory" => StorageBackend::Memory,
            _ => return Err(ConfigError::Invalid("STORAGE_BACKEND")),
        };

        let storage_bucket = match storage_backend {
            StorageBackend::Gcp => env::var("STORAGE_BUCKET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STORAGE_BUCKET"))?,
            StorageBackend::Memory => {
                env::var("STORAGE_BUCKET").unwrap_or_else(|_| "local".to_string())
            }
        };

        let streak_policy = match env::var("STREAK_POLICY") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("STREAK_POLICY"))?,
            Err(_) => StreakPolicy::default(),
        };

        let set_total_rollover = match env::var("SET_TOTAL_ROLLOVER") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("SET_TOTAL_ROLLOVER"))?,
            Err(_) => SetTotalRollover::default(),
        };

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            storage_backend,
            storage_bucket,
            max_image_bytes: env::var("MAX_IMAGE_BYTES")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_MAX_IMAGE_BYTES),
            streak_policy,
            set_total_rollover,

            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
