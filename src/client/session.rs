// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The client's single "who is signed in" slot.

use crate::models::User;
use std::sync::Arc;
use tokio::sync::watch;

/// A signed-in user and the token that proves it.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSession {
    pub user: User,
    pub token: String,
}

/// Current identity, shared by every clone.
///
/// Anyone may read or watch it. Only the [`ApiClient`](super::ApiClient)
/// identity operations write it: signup/login/refresh populate it and
/// logout clears it.
#[derive(Debug, Clone)]
pub struct SessionState {
    tx: Arc<watch::Sender<Option<ClientSession>>>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Snapshot of the current session, if any.
    pub fn current(&self) -> Option<ClientSession> {
        self.tx.borrow().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.tx.borrow().as_ref().map(|s| s.user.clone())
    }

    pub fn is_signed_in(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// Receiver that wakes on every sign-in, refresh and sign-out.
    pub fn subscribe(&self) -> watch::Receiver<Option<ClientSession>> {
        self.tx.subscribe()
    }

    pub(crate) fn token(&self) -> Option<String> {
        self.tx.borrow().as_ref().map(|s| s.token.clone())
    }

    pub(crate) fn set(&self, session: ClientSession) {
        self.tx.send_replace(Some(session));
    }

    /// Replace the user record, keeping the token. No-op when signed out.
    pub(crate) fn set_user(&self, user: User) {
        self.tx.send_if_modified(|slot| match slot {
            Some(session) => {
                session.user = user;
                true
            }
            None => false,
        });
    }

    pub(crate) fn clear(&self) {
        self.tx.send_replace(None);
    }
}
