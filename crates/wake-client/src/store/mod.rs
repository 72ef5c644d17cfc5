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

//! Server record store layer.
//!
//! Defines the [`ServerRecord`] data model and the [`ServerStore`] trait the
//! dashboard talks to, with two implementations: [`RestStore`] for a hosted
//! PostgREST-style backend and [`MemoryStore`] for offline use and tests.

mod memory;
mod rest;

pub use memory::MemoryStore;
pub use rest::{RestStore, RestStoreConfig};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered server as stored in the backing collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerRecord {
    /// Store-assigned unique id, immutable for the record's lifetime.
    pub id: i64,
    /// Probe target URL.
    pub url: String,
    /// Optional display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Store-assigned creation timestamp, used for default ordering.
    pub created_at: DateTime<Utc>,
}

impl ServerRecord {
    /// Display name, with a placeholder for unnamed records.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed Server")
    }
}

/// Errors from the external server-record store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Transport-level failure talking to the backend.
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    /// The backend answered with a non-success status.
    #[error("store request failed with status {status}: {message}")]
    Backend {
        /// HTTP status code returned by the backend.
        status: u16,
        /// Response body, as returned by the backend.
        message: String,
    },
}

/// Operations the dashboard needs from a server-record store.
///
/// `list()` results must be ordered by `created_at` descending (newest
/// first); the registry renders them as-is.
#[async_trait]
pub trait ServerStore: Send + Sync {
    /// Fetch all records, newest first.
    async fn list(&self) -> Result<Vec<ServerRecord>, StoreError>;
    /// Insert a new record. The store assigns id and creation timestamp.
    async fn insert(&self, url: &str, name: Option<&str>) -> Result<(), StoreError>;
    /// Delete the record with `id`. Deleting an absent id is not an error.
    async fn delete(&self, id: i64) -> Result<(), StoreError>;
}
