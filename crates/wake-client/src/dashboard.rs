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

//! Dashboard facade wiring the store, registry, status line, and ping
//! orchestrator together behind a handle a UI thread can poll.
//!
//! Mutating operations spawn onto the supplied runtime handle and report
//! exclusively through shared state: the registry snapshot, the status line,
//! and the per-id workflow flags. Nothing here ever propagates an error to
//! the caller; store failures become transient status text.

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{error, info};
use tokio::runtime::Handle;
use tokio::time::sleep;

use crate::ping::{PingManager, PingSession};
use crate::probe::WakeProbe;
use crate::registry::ServerRegistry;
use crate::status::{StatusKind, StatusLine};
use crate::store::{ServerRecord, ServerStore};

/// How long a mutation status message stays visible.
pub const STATUS_DWELL: Duration = Duration::from_secs(3);

#[derive(Debug, Default)]
struct WorkflowFlags {
    adding: bool,
    deleting: HashSet<i64>,
}

/// Handle to the dashboard state machine.
pub struct Dashboard {
    store: Arc<dyn ServerStore>,
    registry: Arc<ServerRegistry>,
    pings: PingManager,
    status: Arc<StatusLine>,
    flags: Arc<Mutex<WorkflowFlags>>,
    clear_inputs: Arc<AtomicBool>,
    handle: Handle,
}

impl fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dashboard").finish_non_exhaustive()
    }
}

impl Dashboard {
    /// Create a dashboard over `store`, probing with `probe`, spawning all
    /// async work on `handle`.
    #[must_use]
    pub fn new(store: Arc<dyn ServerStore>, probe: Arc<dyn WakeProbe>, handle: Handle) -> Self {
        Self {
            store,
            registry: Arc::new(ServerRegistry::new()),
            pings: PingManager::new(probe, handle.clone()),
            status: Arc::new(StatusLine::new()),
            flags: Arc::new(Mutex::new(WorkflowFlags::default())),
            clear_inputs: Arc::new(AtomicBool::new(false)),
            handle,
        }
    }

    /// Refetch the server list, replacing the registry snapshot.
    pub fn reload(&self) {
        let store = Arc::clone(&self.store);
        let registry = Arc::clone(&self.registry);
        let status = Arc::clone(&self.status);
        self.handle.spawn(async move {
            load_servers(&*store, &registry, &status).await;
        });
    }

    /// Validate and insert a new server, then reload the registry.
    ///
    /// An empty (after trimming) URL is a complete no-op: no store call, no
    /// status change. An empty name is stored as null.
    pub fn add_server(&self, url: &str, name: &str) {
        let url = url.trim().to_string();
        if url.is_empty() {
            return;
        }
        let name = name.trim().to_string();
        let name = (!name.is_empty()).then_some(name);

        self.flags.lock().unwrap().adding = true;

        let store = Arc::clone(&self.store);
        let registry = Arc::clone(&self.registry);
        let status = Arc::clone(&self.status);
        let flags = Arc::clone(&self.flags);
        let clear_inputs = Arc::clone(&self.clear_inputs);
        self.handle.spawn(async move {
            let generation = match store.insert(&url, name.as_deref()).await {
                Ok(()) => {
                    info!("Added server {}", url);
                    clear_inputs.store(true, Ordering::Relaxed);
                    let generation = status.set("Server added successfully!", StatusKind::Success);
                    load_servers(&*store, &registry, &status).await;
                    generation
                }
                Err(e) => {
                    error!("Failed to add server {}: {}", url, e);
                    status.set(format!("Error: {}", e), StatusKind::Error)
                }
            };
            flags.lock().unwrap().adding = false;
            sleep(STATUS_DWELL).await;
            status.clear_if_current(generation);
        });
    }

    /// Delete a server by id, then reload the registry.
    pub fn delete_server(&self, id: i64) {
        self.flags.lock().unwrap().deleting.insert(id);

        let store = Arc::clone(&self.store);
        let registry = Arc::clone(&self.registry);
        let status = Arc::clone(&self.status);
        let flags = Arc::clone(&self.flags);
        self.handle.spawn(async move {
            let generation = match store.delete(id).await {
                Ok(()) => {
                    info!("Deleted server {}", id);
                    let generation =
                        status.set("Server deleted successfully!", StatusKind::Success);
                    load_servers(&*store, &registry, &status).await;
                    generation
                }
                Err(e) => {
                    error!("Failed to delete server {}: {}", id, e);
                    status.set(format!("Error: {}", e), StatusKind::Error)
                }
            };
            flags.lock().unwrap().deleting.remove(&id);
            sleep(STATUS_DWELL).await;
            status.clear_if_current(generation);
        });
    }

    /// Forget the loaded list, returning the view to its pre-load state.
    /// Used when the session ends.
    pub fn clear_servers(&self) {
        self.registry.clear();
    }

    /// Start a wake session for `server`.
    ///
    /// Callers should gate on [`Self::is_pinging`] and [`Self::is_deleting`];
    /// an ungated restart supersedes the running session.
    pub fn start_ping(&self, server: &ServerRecord) {
        self.pings.start_ping(server);
    }

    /// Last-loaded server list, or `None` before the first load completes.
    #[must_use]
    pub fn servers(&self) -> Option<Vec<ServerRecord>> {
        self.registry.current()
    }

    /// Current transient status message, if any.
    #[must_use]
    pub fn status(&self) -> Option<(String, StatusKind)> {
        self.status.current()
    }

    /// Whether an insert workflow is in flight.
    #[must_use]
    pub fn is_adding(&self) -> bool {
        self.flags.lock().unwrap().adding
    }

    /// Whether a delete workflow is in flight for `id`.
    #[must_use]
    pub fn is_deleting(&self, id: i64) -> bool {
        self.flags.lock().unwrap().deleting.contains(&id)
    }

    /// Whether a wake probe is in flight for `id`.
    #[must_use]
    pub fn is_pinging(&self, id: i64) -> bool {
        self.pings.is_pinging(id)
    }

    /// Ping session snapshot for `id`, if one is in flight or dwelling.
    #[must_use]
    pub fn ping_session(&self, id: i64) -> Option<PingSession> {
        self.pings.session(id)
    }

    /// One-shot view event: true exactly once after a successful add,
    /// telling the form to clear its input fields.
    pub fn take_clear_inputs(&self) -> bool {
        self.clear_inputs.swap(false, Ordering::Relaxed)
    }
}

async fn load_servers(store: &dyn ServerStore, registry: &ServerRegistry, status: &StatusLine) {
    match store.list().await {
        Ok(servers) => {
            info!("Loaded {} servers", servers.len());
            registry.replace(servers);
        }
        Err(e) => {
            // A failed load degrades to an empty list; it never blocks the UI.
            error!("Failed to load servers: {}", e);
            status.set(format!("Error: {}", e), StatusKind::Error);
            registry.replace(Vec::new());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::ProbeError;
    use crate::store::{MemoryStore, StoreError};
    use async_trait::async_trait;
    use chrono::{Duration as ChronoDuration, Utc};

    struct InstantProbe;

    #[async_trait]
    impl WakeProbe for InstantProbe {
        async fn wake(&self, _url: &str) -> Result<(), ProbeError> {
            Ok(())
        }
    }

    struct FailingStore;

    #[async_trait]
    impl ServerStore for FailingStore {
        async fn list(&self) -> Result<Vec<ServerRecord>, StoreError> {
            Err(StoreError::Backend {
                status: 500,
                message: "list failed".to_string(),
            })
        }

        async fn insert(&self, _url: &str, _name: Option<&str>) -> Result<(), StoreError> {
            Err(StoreError::Backend {
                status: 500,
                message: "insert failed".to_string(),
            })
        }

        async fn delete(&self, _id: i64) -> Result<(), StoreError> {
            Err(StoreError::Backend {
                status: 500,
                message: "delete failed".to_string(),
            })
        }
    }

    fn dashboard_over(store: Arc<dyn ServerStore>) -> Dashboard {
        Dashboard::new(store, Arc::new(InstantProbe), Handle::current())
    }

    fn record(id: i64, age_minutes: i64) -> ServerRecord {
        ServerRecord {
            id,
            url: format!("https://app{}.example.com", id),
            name: None,
            created_at: Utc::now() - ChronoDuration::minutes(age_minutes),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn add_with_empty_url_is_a_complete_noop() {
        let store = Arc::new(MemoryStore::new());
        let dashboard = dashboard_over(store.clone());

        dashboard.add_server("   ", "Some name");
        sleep(Duration::from_millis(50)).await;

        assert!(store.list().await.unwrap().is_empty());
        assert!(dashboard.status().is_none());
        assert!(!dashboard.is_adding());
        assert!(!dashboard.take_clear_inputs());
    }

    #[tokio::test(start_paused = true)]
    async fn successful_add_reloads_and_clears_status_after_dwell() {
        let dashboard = dashboard_over(Arc::new(MemoryStore::new()));

        dashboard.add_server(" https://myapp.onrender.com ", "  My App  ");
        sleep(Duration::from_millis(50)).await;

        let servers = dashboard.servers().unwrap();
        assert_eq!(servers.len(), 1);
        assert_eq!(servers[0].url, "https://myapp.onrender.com");
        assert_eq!(servers[0].name.as_deref(), Some("My App"));
        assert_eq!(
            dashboard.status(),
            Some(("Server added successfully!".to_string(), StatusKind::Success))
        );
        assert!(dashboard.take_clear_inputs());
        assert!(!dashboard.take_clear_inputs());
        assert!(!dashboard.is_adding());

        sleep(Duration::from_secs(3)).await;
        assert!(dashboard.status().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn blank_name_is_stored_as_null() {
        let dashboard = dashboard_over(Arc::new(MemoryStore::new()));

        dashboard.add_server("https://myapp.onrender.com", "   ");
        sleep(Duration::from_millis(50)).await;

        let servers = dashboard.servers().unwrap();
        assert_eq!(servers[0].name, None);
        assert_eq!(servers[0].display_name(), "Unnamed Server");
    }

    #[tokio::test(start_paused = true)]
    async fn successful_delete_removes_the_record_from_the_registry() {
        let store = Arc::new(MemoryStore::with_records(vec![record(7, 10), record(9, 5)]));
        let dashboard = dashboard_over(store);

        dashboard.reload();
        sleep(Duration::from_millis(50)).await;
        assert_eq!(dashboard.servers().unwrap().len(), 2);

        dashboard.delete_server(7);
        sleep(Duration::from_millis(50)).await;

        assert!(dashboard.servers().unwrap().iter().all(|r| r.id != 7));
        assert_eq!(
            dashboard.status(),
            Some((
                "Server deleted successfully!".to_string(),
                StatusKind::Success
            ))
        );
        assert!(!dashboard.is_deleting(7));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_insert_surfaces_an_error_status() {
        let dashboard = dashboard_over(Arc::new(FailingStore));

        dashboard.add_server("https://myapp.onrender.com", "");
        sleep(Duration::from_millis(50)).await;

        let (text, kind) = dashboard.status().unwrap();
        assert!(text.starts_with("Error: "));
        assert!(text.contains("insert failed"));
        assert_eq!(kind, StatusKind::Error);
        assert!(!dashboard.take_clear_inputs());
        assert!(!dashboard.is_adding());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_load_degrades_to_an_empty_list() {
        let dashboard = dashboard_over(Arc::new(FailingStore));

        dashboard.reload();
        sleep(Duration::from_millis(50)).await;

        assert_eq!(dashboard.servers(), Some(Vec::new()));
        let (text, kind) = dashboard.status().unwrap();
        assert!(text.contains("list failed"));
        assert_eq!(kind, StatusKind::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn reload_orders_newest_first() {
        let store = Arc::new(MemoryStore::with_records(vec![
            record(1, 30),
            record(2, 20),
            record(3, 10),
        ]));
        let dashboard = dashboard_over(store);

        dashboard.reload();
        sleep(Duration::from_millis(50)).await;

        let ids: Vec<i64> = dashboard.servers().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }
}
