// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Object storage for profile images.

pub mod gcs;
pub mod memory;

pub use gcs::GcsStorage;
pub use memory::MemoryObjectStore;

use crate::error::AppError;
use async_trait::async_trait;
use bytes::Bytes;

/// Blob operations used by the profile editor.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `body` at `key`, replacing any existing object.
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str)
        -> Result<(), AppError>;

    /// Remove the object at `key`. Fails if there is no such object.
    async fn delete_object(&self, key: &str) -> Result<(), AppError>;

    /// URL a browser can fetch the object from.
    async fn download_url(&self, key: &str) -> Result<String, AppError>;
}

/// Fixed location of a user's profile image.
pub fn profile_image_key(uid: &str) -> String {
    format!("users/{}/profile.jpg", uid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_image_key() {
        assert_eq!(profile_image_key("abc123"), "users/abc123/profile.jpg");
    }
}
