// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User profile and account models.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// User profile stored in Firestore.
///
/// Stored at: `users/{uid}`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct User {
    /// Opaque user id (also used as document ID)
    pub uid: String,
    /// Sign-in email
    #[serde(default)]
    pub email: String,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Download URL of the profile image ("" once deleted)
    #[serde(default, alias = "photoURL", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    /// When the account was created (RFC 3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last profile update (RFC 3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Partial profile fields. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl User {
    /// Shallow-merge `update` into this record.
    pub fn merge(&mut self, update: ProfileUpdate, now: &str) {
        if let Some(name) = update.name {
            self.name = Some(name);
        }
        if let Some(bio) = update.bio {
            self.bio = Some(bio);
        }
        if let Some(photo_url) = update.photo_url {
            self.photo_url = Some(photo_url);
        }
        self.updated_at = Some(now.to_string());
    }
}

/// Email/password credentials for the built-in identity provider.
///
/// Stored at: `accounts/{normalized email}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub uid: String,
    /// Normalized (trimmed, lower-cased) email
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
    pub created_at: String,
}

/// Normalize an email for use as an account key.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored_user() -> User {
        User {
            uid: "u1".to_string(),
            email: "a@example.com".to_string(),
            name: Some("Old".to_string()),
            bio: Some("Old bio".to_string()),
            photo_url: Some("https://example.com/p.jpg".to_string()),
            created_at: Some("2024-01-01T00:00:00Z".to_string()),
            updated_at: None,
        }
    }

    #[test]
    fn test_merge_overwrites_only_given_fields() {
        let mut user = stored_user();
        user.merge(
            ProfileUpdate {
                name: Some("New".to_string()),
                ..Default::default()
            },
            "2024-02-01T00:00:00Z",
        );

        assert_eq!(user.name.as_deref(), Some("New"));
        assert_eq!(user.bio.as_deref(), Some("Old bio"));
        assert_eq!(user.photo_url.as_deref(), Some("https://example.com/p.jpg"));
        assert_eq!(user.created_at.as_deref(), Some("2024-01-01T00:00:00Z"));
        assert_eq!(user.updated_at.as_deref(), Some("2024-02-01T00:00:00Z"));
    }

    #[test]
    fn test_merge_can_clear_photo() {
        let mut user = stored_user();
        user.merge(
            ProfileUpdate {
                photo_url: Some(String::new()),
                ..Default::default()
            },
            "now",
        );
        assert_eq!(user.photo_url.as_deref(), Some(""));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Foo@Example.COM "), "foo@example.com");
    }

    #[test]
    fn test_camel_case_photo_url_deserializes() {
        let user: User = serde_json::from_str(
            r#"{"uid": "u1", "email": "a@example.com", "photoURL": "https://example.com/p.jpg"}"#,
        )
        .unwrap();
        assert_eq!(user.photo_url.as_deref(), Some("https://example.com/p.jpg"));
    }
}
