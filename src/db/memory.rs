// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process document store for local development and tests.

use crate::db::{account_doc_id, Store};
use crate::error::AppError;
use crate::models::{Account, AttendanceSummary, User, WorkoutSplit};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Document store backed by concurrent hash maps.
///
/// Can be switched offline to simulate a store outage; every operation then
/// fails with [`AppError::Database`].
#[derive(Default)]
pub struct MemoryDb {
    users: DashMap<String, User>,
    accounts: DashMap<String, Account>,
    summaries: DashMap<String, AttendanceSummary>,
    splits: DashMap<String, WorkoutSplit>,
    offline: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail (or succeed again).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of successful writes since creation.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> Result<(), AppError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::Database(
                "Database not connected (offline mode)".to_string(),
            ));
        }
        Ok(())
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Store for MemoryDb {
    async fn get_user(&self, uid: &str) -> Result<Option<User>, AppError> {
        self.check_online()?;
        Ok(self.users.get(uid).map(|u| u.clone()))
    }

    async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        self.check_online()?;
        self.users.insert(user.uid.clone(), user.clone());
        self.record_write();
        Ok(())
    }

    async fn get_account(&self, email: &str) -> Result<Option<Account>, AppError> {
        self.check_online()?;
        Ok(self.accounts.get(&account_doc_id(email)).map(|a| a.clone()))
    }

    async fn create_account(&self, account: &Account) -> Result<(), AppError> {
        self.check_online()?;
        match self.accounts.entry(account_doc_id(&account.email)) {
            Entry::Occupied(_) => Err(AppError::Conflict(format!(
                "Account {} already exists",
                account.email
            ))),
            Entry::Vacant(slot) => {
                slot.insert(account.clone());
                self.record_write();
                Ok(())
            }
        }
    }

    async fn get_attendance_summary(
        &self,
        uid: &str,
    ) -> Result<Option<AttendanceSummary>, AppError> {
        self.check_online()?;
        Ok(self.summaries.get(uid).map(|s| s.clone()))
    }

    async fn set_attendance_summary(
        &self,
        uid: &str,
        summary: &AttendanceSummary,
    ) -> Result<(), AppError> {
        self.check_online()?;
        self.summaries.insert(uid.to_string(), summary.clone());
        self.record_write();
        Ok(())
    }

    async fn get_workout_split(&self, split_id: &str) -> Result<Option<WorkoutSplit>, AppError> {
        self.check_online()?;
        Ok(self.splits.get(split_id).map(|s| s.clone()))
    }

    async fn set_workout_split(
        &self,
        split_id: &str,
        split: &WorkoutSplit,
    ) -> Result<(), AppError> {
        self.check_online()?;
        self.splits.insert(split_id.to_string(), split.clone());
        self.record_write();
        Ok(())
    }
}
