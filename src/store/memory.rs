// gitpad: edit-and-commit core for hosted repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! In-memory backend with an optional byte quota.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::KvStore;
use crate::error::{PadResult, StorageError};

/// Volatile store; the quota counts key and value bytes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that refuses writes once `bytes` would be exceeded.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: Mutex::default(),
            quota: Some(bytes),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Bytes used by `entries` after replacing `key` with `value`.
pub(super) fn size_after_set(entries: &BTreeMap<String, String>, key: &str, value: &str) -> usize {
    let current: usize = entries.iter().map(|(k, v)| k.len() + v.len()).sum();
    let replaced = entries.get(key).map_or(0, |old| key.len() + old.len());
    current - replaced + key.len() + value.len()
}

pub(super) fn check_quota(
    quota: Option<usize>,
    entries: &BTreeMap<String, String>,
    key: &str,
    value: &str,
) -> PadResult<()> {
    if let Some(limit) = quota {
        let needed = size_after_set(entries, key, value);
        if needed > limit {
            return Err(StorageError::QuotaExceeded {
                key: key.to_string(),
                needed,
                limit,
            }
            .into());
        }
    }
    Ok(())
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> PadResult<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> PadResult<()> {
        let mut entries = self.lock();
        check_quota(self.quota, &entries, key, value)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> PadResult<()> {
        self.lock().remove(key);
        Ok(())
    }

    fn keys(&self, prefix: &str) -> PadResult<Vec<String>> {
        Ok(self
            .lock()
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect())
    }
}
