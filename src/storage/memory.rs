// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process object store for local development and tests.

use crate::error::AppError;
use crate::storage::ObjectStore;
use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// A stored blob and its content type.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub body: Bytes,
    pub content_type: String,
}

/// Object store backed by a concurrent hash map.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: DashMap<String, StoredObject>,
    offline: AtomicBool,
    calls: AtomicUsize,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail (or succeed again).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of operations attempted, successful or not.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.get(key).map(|o| o.clone())
    }

    fn begin_call(&self) -> Result<(), AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::Storage(
                "Object store not reachable (offline mode)".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), AppError> {
        self.begin_call()?;
        self.objects.insert(
            key.to_string(),
            StoredObject {
                body,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> Result<(), AppError> {
        self.begin_call()?;
        self.objects
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| AppError::Storage(format!("Object {} does not exist", key)))
    }

    async fn download_url(&self, key: &str) -> Result<String, AppError> {
        self.begin_call()?;
        if !self.objects.contains_key(key) {
            return Err(AppError::Storage(format!("Object {} does not exist", key)));
        }
        Ok(format!("https://storage.local/{}", key))
    }
}
