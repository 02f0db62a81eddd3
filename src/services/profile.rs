// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile editing: display name, bio and profile image.

use crate::error::AppError;
use crate::models::{ProfileUpdate, User};
use crate::services::identity::IdentityService;
use crate::storage::{profile_image_key, ObjectStore};
use bytes::Bytes;
use std::sync::Arc;

/// An uploaded image as received from the client.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub body: Bytes,
    pub content_type: String,
}

/// Text fields of a profile save. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ProfileFields {
    pub name: Option<String>,
    pub bio: Option<String>,
}

/// Reject anything that is not an image or is larger than `max_bytes`.
pub fn validate_image(image: &ImageUpload, max_bytes: usize) -> Result<(), AppError> {
    if !image.content_type.starts_with("image/") {
        return Err(AppError::BadRequest(
            "Only image files are allowed".to_string(),
        ));
    }

    if image.body.len() > max_bytes {
        return Err(AppError::BadRequest(format!(
            "Max file size is {}",
            format_size(max_bytes)
        )));
    }

    Ok(())
}

fn format_size(bytes: usize) -> String {
    const MIB: usize = 1024 * 1024;
    if bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Saves profile fields and manages the profile image.
#[derive(Clone)]
pub struct ProfileEditor {
    identity: IdentityService,
    storage: Arc<dyn ObjectStore>,
    max_image_bytes: usize,
}

impl ProfileEditor {
    pub fn new(
        identity: IdentityService,
        storage: Arc<dyn ObjectStore>,
        max_image_bytes: usize,
    ) -> Self {
        Self {
            identity,
            storage,
            max_image_bytes,
        }
    }

    /// Save name/bio and, optionally, a new profile image.
    ///
    /// The image is validated before anything is sent to a store. A new
    /// image replaces the previous one at the user's fixed image path.
    pub async fn save_profile(
        &self,
        uid: &str,
        email: &str,
        fields: ProfileFields,
        image: Option<ImageUpload>,
    ) -> Result<User, AppError> {
        if let Some(image) = &image {
            validate_image(image, self.max_image_bytes)?;
        }

        let photo_url = match image {
            Some(image) => {
                let key = profile_image_key(uid);
                let size = image.body.len();
                self.storage
                    .put_object(&key, image.body, &image.content_type)
                    .await?;
                tracing::info!(uid, key = %key, size, "Profile image uploaded");
                self.storage.download_url(&key).await?
            }
            None => self
                .identity
                .current_user(uid, email)
                .await?
                .photo_url
                .unwrap_or_default(),
        };

        self.identity
            .update_profile(
                uid,
                email,
                ProfileUpdate {
                    name: fields.name,
                    bio: fields.bio,
                    photo_url: Some(photo_url),
                },
            )
            .await
    }

    /// Delete the stored image and clear the profile's image URL.
    ///
    /// If the object store delete fails the profile record is not touched.
    pub async fn delete_image(&self, uid: &str, email: &str) -> Result<User, AppError> {
        let key = profile_image_key(uid);
        self.storage.delete_object(&key).await.map_err(|e| {
            tracing::warn!(uid, key = %key, error = %e, "Profile image delete failed");
            e
        })?;

        self.identity
            .update_profile(
                uid,
                email,
                ProfileUpdate {
                    photo_url: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MAX_IMAGE_BYTES;
    use crate::db::{MemoryDb, Store};
    use crate::storage::MemoryObjectStore;

    fn editor() -> (ProfileEditor, Arc<MemoryDb>, Arc<MemoryObjectStore>) {
        let db = Arc::new(MemoryDb::new());
        let storage = Arc::new(MemoryObjectStore::new());
        let identity = IdentityService::new(db.clone(), b"key".to_vec());
        (
            ProfileEditor::new(identity, storage.clone(), DEFAULT_MAX_IMAGE_BYTES),
            db,
            storage,
        )
    }

    fn image(len: usize, content_type: &str) -> ImageUpload {
        ImageUpload {
            body: Bytes::from(vec![0u8; len]),
            content_type: content_type.to_string(),
        }
    }

    #[test]
    fn test_validate_image() {
        assert!(validate_image(&image(10, "image/png"), 2 * 1024 * 1024).is_ok());
        assert!(validate_image(&image(2 * 1024 * 1024, "image/jpeg"), 2 * 1024 * 1024).is_ok());

        let err = validate_image(&image(2 * 1024 * 1024 + 1, "image/jpeg"), 2 * 1024 * 1024)
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid request: Max file size is 2MB");

        let err = validate_image(&image(10, "application/pdf"), 2 * 1024 * 1024).unwrap_err();
        assert_eq!(err.to_string(), "Invalid request: Only image files are allowed");
    }

    #[tokio::test]
    async fn test_oversized_image_makes_no_remote_call() {
        let (editor, db, storage) = editor();

        let err = editor
            .save_profile(
                "u1",
                "a@example.com",
                ProfileFields::default(),
                Some(image(5 * 1024 * 1024, "image/jpeg")),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(storage.call_count(), 0);
        assert_eq!(db.write_count(), 0);
    }

    #[tokio::test]
    async fn test_non_image_makes_no_remote_call() {
        let (editor, db, storage) = editor();

        let err = editor
            .save_profile(
                "u1",
                "a@example.com",
                ProfileFields::default(),
                Some(image(100, "text/plain")),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(storage.call_count(), 0);
        assert_eq!(db.write_count(), 0);
    }

    #[tokio::test]
    async fn test_save_with_image_sets_photo_url() {
        let (editor, db, storage) = editor();

        let user = editor
            .save_profile(
                "u1",
                "a@example.com",
                ProfileFields {
                    name: Some("Ada".to_string()),
                    bio: Some("Lifts".to_string()),
                },
                Some(image(1024, "image/png")),
            )
            .await
            .unwrap();

        assert_eq!(
            user.photo_url.as_deref(),
            Some("https://storage.local/users/u1/profile.jpg")
        );
        assert_eq!(user.name.as_deref(), Some("Ada"));
        assert!(storage.get("users/u1/profile.jpg").is_some());
        assert_eq!(db.get_user("u1").await.unwrap(), Some(user));
    }

    #[tokio::test]
    async fn test_save_without_image_keeps_photo_url() {
        let (editor, _db, _storage) = editor();
        editor
            .save_profile(
                "u1",
                "a@example.com",
                ProfileFields::default(),
                Some(image(10, "image/png")),
            )
            .await
            .unwrap();

        let user = editor
            .save_profile(
                "u1",
                "a@example.com",
                ProfileFields {
                    name: Some("New".to_string()),
                    bio: None,
                },
                None,
            )
            .await
            .unwrap();

        assert_eq!(
            user.photo_url.as_deref(),
            Some("https://storage.local/users/u1/profile.jpg")
        );
        assert_eq!(user.name.as_deref(), Some("New"));
    }

    #[tokio::test]
    async fn test_delete_image_clears_url() {
        let (editor, _db, storage) = editor();
        editor
            .save_profile("u1", "a@example.com", ProfileFields::default(), Some(image(10, "image/png")))
            .await
            .unwrap();

        let user = editor.delete_image("u1", "a@example.com").await.unwrap();
        assert_eq!(user.photo_url.as_deref(), Some(""));
        assert!(storage.get("users/u1/profile.jpg").is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_image_leaves_record_untouched() {
        let (editor, db, _storage) = editor();
        let stored = User {
            uid: "u1".to_string(),
            email: "a@example.com".to_string(),
            photo_url: Some("https://example.com/stale.jpg".to_string()),
            ..Default::default()
        };
        db.upsert_user(&stored).await.unwrap();

        let err = editor.delete_image("u1", "a@example.com").await.unwrap_err();

        assert!(matches!(err, AppError::Storage(_)));
        assert_eq!(db.get_user("u1").await.unwrap(), Some(stored));
    }
}
