// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cloud Storage client for profile images.
//!
//! Uses the Cloud Storage JSON API directly. Download URLs follow the
//! Firebase Storage scheme: each object carries a download token in its
//! metadata, and the URL embeds that token.

use crate::error::AppError;
use crate::storage::ObjectStore;
use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const API_BASE: &str = "https://storage.googleapis.com";
const DOWNLOAD_BASE: &str = "https://firebasestorage.googleapis.com";
const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";
const DOWNLOAD_TOKEN_KEY: &str = "firebaseStorageDownloadTokens";
// Refresh access tokens this long before they expire.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Access token from the metadata server, with its expiry.
struct CachedToken {
    value: String,
    expires_at: Instant,
}

#[derive(Deserialize)]
struct MetadataTokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Deserialize)]
struct ObjectResource {
    #[serde(default)]
    metadata: HashMap<String, String>,
}

/// Cloud Storage client.
pub struct GcsStorage {
    http: reqwest::Client,
    bucket: String,
    api_base: String,
    download_base: String,
    /// `None` when talking to an emulator that needs no credentials
    token: Option<Mutex<Option<CachedToken>>>,
}

impl GcsStorage {
    /// Create a client for `bucket`.
    ///
    /// For local development with an emulator, set STORAGE_EMULATOR_HOST
    /// (e.g. `http://localhost:9199`).
    pub fn new(bucket: &str) -> Self {
        match std::env::var("STORAGE_EMULATOR_HOST") {
            Ok(host) => {
                let host = host.trim_end_matches('/').to_string();
                tracing::info!(host = %host, bucket, "Using Cloud Storage emulator");
                Self {
                    http: reqwest::Client::new(),
                    bucket: bucket.to_string(),
                    api_base: host.clone(),
                    download_base: host,
                    token: None,
                }
            }
            Err(_) => {
                tracing::info!(bucket, "Cloud Storage client initialized");
                Self {
                    http: reqwest::Client::new(),
                    bucket: bucket.to_string(),
                    api_base: API_BASE.to_string(),
                    download_base: DOWNLOAD_BASE.to_string(),
                    token: Some(Mutex::new(None)),
                }
            }
        }
    }

    /// Get a cached access token, fetching a new one from the metadata
    /// server when it is missing or about to expire.
    async fn access_token(&self) -> Result<Option<String>, AppError> {
        let Some(cache) = &self.token else {
            return Ok(None);
        };

        let mut guard = cache.lock().await;
        if let Some(token) = guard.as_ref() {
            if token.expires_at > Instant::now() + TOKEN_EXPIRY_MARGIN {
                return Ok(Some(token.value.clone()));
            }
        }

        let response = self
            .http
            .get(METADATA_TOKEN_URL)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Metadata token request failed: {}", e)))?;
        let fresh: MetadataTokenResponse = check_response_json(response).await?;

        tracing::debug!(expires_in = fresh.expires_in, "Fetched storage access token");

        *guard = Some(CachedToken {
            value: fresh.access_token.clone(),
            expires_at: Instant::now() + Duration::from_secs(fresh.expires_in),
        });
        Ok(Some(fresh.access_token))
    }

    fn with_auth(
        &self,
        request: reqwest::RequestBuilder,
        token: Option<String>,
    ) -> reqwest::RequestBuilder {
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/b/{}/o/{}",
            self.api_base,
            self.bucket,
            urlencoding::encode(key)
        )
    }

    /// Fetch object metadata.
    async fn get_object(&self, key: &str) -> Result<ObjectResource, AppError> {
        let token = self.access_token().await?;
        let response = self
            .with_auth(self.http.get(self.object_url(key)), token)
            .send()
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;
        check_response_json(response).await
    }
}

#[async_trait]
impl ObjectStore for GcsStorage {
    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), AppError> {
        let token = self.access_token().await?;
        let upload_url = format!("{}/upload/storage/v1/b/{}/o", self.api_base, self.bucket);

        let response = self
            .with_auth(self.http.post(&upload_url), token.clone())
            .query(&[("uploadType", "media"), ("name", key)])
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Upload failed: {}", e)))?;
        check_response(response).await?;

        // A fresh download token per upload invalidates URLs to the previous image.
        let download_token = uuid::Uuid::new_v4().to_string();
        let patch = serde_json::json!({
            "metadata": { DOWNLOAD_TOKEN_KEY: download_token }
        });
        let response = self
            .with_auth(self.http.patch(self.object_url(key)), token)
            .json(&patch)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Metadata update failed: {}", e)))?;
        check_response(response).await?;

        tracing::info!(key, bucket = %self.bucket, "Object uploaded");
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> Result<(), AppError> {
        let token = self.access_token().await?;
        let response = self
            .with_auth(self.http.delete(self.object_url(key)), token)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Delete failed: {}", e)))?;
        check_response(response).await?;

        tracing::info!(key, "Object deleted");
        Ok(())
    }

    async fn download_url(&self, key: &str) -> Result<String, AppError> {
        let object = self.get_object(key).await?;
        let download_token = object
            .metadata
            .get(DOWNLOAD_TOKEN_KEY)
            .and_then(|tokens| tokens.split(',').next())
            .ok_or_else(|| AppError::Storage(format!("Object {} has no download token", key)))?;

        Ok(format!(
            "{}/v0/b/{}/o/{}?alt=media&token={}",
            self.download_base,
            self.bucket,
            urlencoding::encode(key),
            download_token
        ))
    }
}

/// Check response status and return error if not successful.
async fn check_response(response: reqwest::Response) -> Result<(), AppError> {
    if response.status().is_success() {
        return Ok(());
    }
    Err(response_error(response).await)
}

/// Check response and parse JSON body.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    if !response.status().is_success() {
        return Err(response_error(response).await);
    }

    response
        .json()
        .await
        .map_err(|e| AppError::Storage(format!("Failed to parse response: {}", e)))
}

async fn response_error(response: reqwest::Response) -> AppError {
    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return AppError::Storage("Object does not exist".to_string());
    }

    let body = response.text().await.unwrap_or_default();
    AppError::Storage(format!("HTTP {}: {}", status, body))
}
