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

//! Client library for a server wake dashboard.
//!
//! Manages a list of server URLs persisted in an external hosted store and
//! issues best-effort "wake" HTTP probes against them, the pattern used to
//! keep free-tier hosting instances from idling. The layers can be used
//! independently or composed together:
//!
//! - **Store layer** ([`store`]): the [`ServerRecord`] model and the
//!   [`ServerStore`] trait, with a PostgREST/Supabase REST implementation and
//!   an in-memory one.
//! - **Ping layer** ([`ping`], [`probe`]): per-server wake sessions with a
//!   live elapsed-time ticker, generation-counted supersession, and timed
//!   cleanup of resolved entries.
//! - **Dashboard facade** ([`dashboard`]): wires store, registry, status
//!   line, and ping orchestrator behind a handle an immediate-mode UI polls.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use wake_client::{Dashboard, HttpProbe, MemoryStore};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let dashboard = Dashboard::new(
//!         Arc::new(MemoryStore::new()),
//!         Arc::new(HttpProbe::new()),
//!         tokio::runtime::Handle::current(),
//!     );
//!
//!     dashboard.reload();
//!     dashboard.add_server("https://myapp.onrender.com", "My App");
//!
//!     // Poll shared state from the UI loop.
//!     if let Some(servers) = dashboard.servers() {
//!         for server in &servers {
//!             println!("{}: {}", server.display_name(), server.url);
//!         }
//!     }
//! }
//! ```

pub mod dashboard;
pub mod ping;
pub mod probe;
pub mod registry;
pub mod status;
pub mod store;

pub use dashboard::{Dashboard, STATUS_DWELL};
pub use ping::{PingManager, PingPhase, PingSession, WakeOutcome, RESOLVED_DWELL, TICK_PERIOD};
pub use probe::{HttpProbe, ProbeError, WakeProbe};
pub use registry::ServerRegistry;
pub use status::{StatusKind, StatusLine};
pub use store::{MemoryStore, RestStore, RestStoreConfig, ServerRecord, ServerStore, StoreError};
