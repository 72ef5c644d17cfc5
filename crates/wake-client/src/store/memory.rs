// Copyright 2026 WakeDeck Desktop Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! In-process server-record store.
//!
//! Backs offline mode and the workflow tests. Ids are assigned sequentially
//! and never reused within a process; like the hosted backend, deleting an
//! absent id succeeds silently.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::{ServerRecord, ServerStore, StoreError};

/// Mutexed in-memory record collection.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug)]
struct Inner {
    records: Vec<ServerRecord>,
    next_id: i64,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with existing records.
    #[must_use]
    pub fn with_records(records: Vec<ServerRecord>) -> Self {
        let next_id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        Self {
            inner: Mutex::new(Inner { records, next_id }),
        }
    }
}

#[async_trait]
impl ServerStore for MemoryStore {
    async fn list(&self) -> Result<Vec<ServerRecord>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut records = inner.records.clone();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(records)
    }

    async fn insert(&self, url: &str, name: Option<&str>) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.records.push(ServerRecord {
            id,
            url: url.to_string(),
            name: name.map(str::to_string),
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.records.retain(|r| r.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn record(id: i64, age_minutes: i64) -> ServerRecord {
        ServerRecord {
            id,
            url: format!("https://app{}.example.com", id),
            name: None,
            created_at: Utc::now() - Duration::minutes(age_minutes),
        }
    }

    #[tokio::test]
    async fn list_orders_newest_first() {
        let store = MemoryStore::with_records(vec![record(1, 30), record(2, 10), record(3, 20)]);
        let ids: Vec<i64> = store.list().await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids_after_seed() {
        let store = MemoryStore::with_records(vec![record(7, 5)]);
        store.insert("https://new.example.com", Some("New")).await.unwrap();
        let records = store.list().await.unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().any(|r| r.id == 8 && r.name.as_deref() == Some("New")));
    }

    #[tokio::test]
    async fn delete_is_silent_for_absent_ids() {
        let store = MemoryStore::new();
        store.delete(99).await.unwrap();
        store.insert("https://a.example.com", None).await.unwrap();
        store.delete(1).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }
}
