// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Write the bundled five-day split to Firestore.
//!
//! Usage: `GCP_PROJECT_ID=my-project seed-split`
//! (honors `FIRESTORE_EMULATOR_HOST`).

use fitsplit_tracker::{db::FirestoreDb, services::WorkoutCatalog};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    dotenvy::dotenv().ok();
    let project_id = std::env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string());

    let db = FirestoreDb::new(&project_id).await?;
    let days = WorkoutCatalog::new(Arc::new(db)).seed_default_split().await?;

    println!("Seeded {} workout days into project {}", days, project_id);
    Ok(())
}
