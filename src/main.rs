// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! FitSplit Tracker API Server
//!
//! Serves sign-up/login, the shared workout split, attendance streaks and
//! profile editing.

use fitsplit_tracker::{
    config::{Config, StorageBackend},
    db::{FirestoreDb, MemoryDb, Store},
    services::WorkoutCatalog,
    storage::{GcsStorage, MemoryObjectStore, ObjectStore},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        backend = ?config.storage_backend,
        streak_policy = ?config.streak_policy,
        set_total_rollover = ?config.set_total_rollover,
        "Starting FitSplit Tracker API"
    );

    let (db, storage): (Arc<dyn Store>, Arc<dyn ObjectStore>) = match config.storage_backend {
        StorageBackend::Gcp => {
            let db: Arc<dyn Store> = Arc::new(FirestoreDb::new(&config.gcp_project_id).await?);
            let storage: Arc<dyn ObjectStore> = Arc::new(GcsStorage::new(&config.storage_bucket));
            tracing::info!(
                project = %config.gcp_project_id,
                bucket = %config.storage_bucket,
                "Using Firestore and Cloud Storage"
            );
            (db, storage)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            let db: Arc<dyn Store> = Arc::new(MemoryDb::new());
            // Nothing else would ever write the split in this mode
            WorkoutCatalog::new(db.clone()).seed_default_split().await?;
            let storage: Arc<dyn ObjectStore> = Arc::new(MemoryObjectStore::new());
            (db, storage)
        }
    };

    let state = Arc::new(AppState::new(config.clone(), db, storage));
    let app = fitsplit_tracker::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("fitsplit_tracker=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
