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

//! In-memory mirror of the remote server list.

use std::sync::Mutex;

use crate::store::ServerRecord;

/// Authoritative in-memory cache of the fetched server list.
///
/// Loading is always a full replace, no diffing. `None` means no load has
/// completed yet, distinct from a loaded-but-empty list.
#[derive(Debug, Default)]
pub struct ServerRegistry {
    snapshot: Mutex<Option<Vec<ServerRecord>>>,
}

impl ServerRegistry {
    /// Create an empty, not-yet-loaded registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last-loaded snapshot, or `None` before the first load completes.
    #[must_use]
    pub fn current(&self) -> Option<Vec<ServerRecord>> {
        self.snapshot.lock().unwrap().clone()
    }

    /// Replace the snapshot with a freshly fetched list.
    pub fn replace(&self, servers: Vec<ServerRecord>) {
        *self.snapshot.lock().unwrap() = Some(servers);
    }

    /// Drop the snapshot, returning to the not-yet-loaded state.
    pub fn clear(&self) {
        *self.snapshot.lock().unwrap() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(id: i64) -> ServerRecord {
        ServerRecord {
            id,
            url: format!("https://app{}.example.com", id),
            name: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn starts_unloaded_then_reflects_replacements() {
        let registry = ServerRegistry::new();
        assert!(registry.current().is_none());

        registry.replace(vec![record(1), record(2)]);
        assert_eq!(registry.current().unwrap().len(), 2);

        registry.replace(Vec::new());
        assert_eq!(registry.current(), Some(Vec::new()));

        registry.clear();
        assert!(registry.current().is_none());
    }
}
