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

//! Ping orchestrator.
//!
//! Runs one observable wake session per server id: an outbound probe, a
//! 100 ms elapsed-time ticker, a terminal message, and timed removal of the
//! resolved entry. Sessions for different ids are fully independent; ticking
//! for one id never delays probing or ticking for another.
//!
//! Every `start_ping` bumps a per-id generation counter. The ticker, the
//! probe resolution, and the dwell removal all re-check that counter before
//! touching shared state, so superseding a ping deterministically discards
//! every late effect of the old one — including the resolution of an
//! in-flight probe, which cannot itself be aborted once issued.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Local;
use log::{debug, info, warn};
use tokio::runtime::Handle;
use tokio::time::{interval, sleep, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::probe::WakeProbe;
use crate::store::ServerRecord;

/// Period of the live elapsed-time ticker.
pub const TICK_PERIOD: Duration = Duration::from_millis(100);

/// How long a resolved ping message stays visible before it is removed.
pub const RESOLVED_DWELL: Duration = Duration::from_secs(6);

/// Phase of a ping session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingPhase {
    /// Probe in flight, ticker running.
    Pinging,
    /// Probe settled; the entry lingers until the dwell expires.
    Resolved,
}

/// How a settled probe ended.
///
/// Both outcomes render as the same success-styled message family; the
/// distinction is kept for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeOutcome {
    /// The request completed without a transport error.
    Woken,
    /// The request failed (DNS, refused, timeout); the wake was still sent.
    Sent,
}

/// Ephemeral per-server record of an in-progress or recently resolved probe.
#[derive(Debug, Clone)]
pub struct PingSession {
    /// Current phase.
    pub phase: PingPhase,
    /// Set once the probe settles.
    pub outcome: Option<WakeOutcome>,
    /// Human-readable current text.
    pub message: String,
    /// Wall-clock time the message was produced.
    pub timestamp: String,
    /// Time spent pinging; frozen once resolved.
    pub elapsed: Duration,
    generation: u64,
}

impl PingSession {
    fn pinging(generation: u64) -> Self {
        Self {
            phase: PingPhase::Pinging,
            outcome: None,
            message: "Pinging...".to_string(),
            timestamp: wall_clock(),
            elapsed: Duration::ZERO,
            generation,
        }
    }
}

fn wall_clock() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

#[derive(Debug)]
struct ActivePing {
    generation: u64,
    cancel: CancellationToken,
}

#[derive(Debug, Default)]
struct PingBoard {
    sessions: HashMap<i64, PingSession>,
    active: HashMap<i64, ActivePing>,
    generations: HashMap<i64, u64>,
}

impl PingBoard {
    fn bump_generation(&mut self, id: i64) -> u64 {
        let slot = self.generations.entry(id).or_insert(0);
        *slot += 1;
        *slot
    }

    fn current_generation(&self, id: i64) -> u64 {
        self.generations.get(&id).copied().unwrap_or(0)
    }
}

/// Orchestrates wake pings, one concurrent session per server id.
///
/// All state lives behind a single mutex; tasks spawn onto the supplied
/// runtime handle so the manager can be driven from a non-async UI thread.
pub struct PingManager {
    board: Arc<Mutex<PingBoard>>,
    probe: Arc<dyn WakeProbe>,
    handle: Handle,
}

impl fmt::Debug for PingManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PingManager").finish_non_exhaustive()
    }
}

impl PingManager {
    /// Create a manager that spawns its tasks on `handle`.
    #[must_use]
    pub fn new(probe: Arc<dyn WakeProbe>, handle: Handle) -> Self {
        Self {
            board: Arc::new(Mutex::new(PingBoard::default())),
            probe,
            handle,
        }
    }

    /// Start (or restart) a wake session for `server`.
    ///
    /// A session already running for the same id is superseded: its ticker is
    /// cancelled immediately and its eventual probe resolution is discarded.
    pub fn start_ping(&self, server: &ServerRecord) {
        let id = server.id;
        let url = server.url.clone();
        let started = Instant::now();

        let (generation, cancel) = {
            let mut board = self.board.lock().unwrap();
            let generation = board.bump_generation(id);
            if let Some(previous) = board.active.remove(&id) {
                debug!(
                    "Superseding ping generation {} for server {}",
                    previous.generation, id
                );
                previous.cancel.cancel();
            }
            let cancel = CancellationToken::new();
            board.active.insert(
                id,
                ActivePing {
                    generation,
                    cancel: cancel.clone(),
                },
            );
            board.sessions.insert(id, PingSession::pinging(generation));
            (generation, cancel)
        };

        info!("Pinging server {} at {}", id, url);
        self.spawn_ticker(id, generation, started, cancel);
        self.spawn_probe(id, generation, url, started);
    }

    /// Whether a probe is currently in flight for `id`.
    #[must_use]
    pub fn is_pinging(&self, id: i64) -> bool {
        self.board.lock().unwrap().active.contains_key(&id)
    }

    /// Snapshot of the session for `id`, if one is in flight or dwelling.
    #[must_use]
    pub fn session(&self, id: i64) -> Option<PingSession> {
        self.board.lock().unwrap().sessions.get(&id).cloned()
    }

    fn spawn_ticker(
        &self,
        id: i64,
        generation: u64,
        started: Instant,
        cancel: CancellationToken,
    ) {
        let board = Arc::clone(&self.board);
        self.handle.spawn(async move {
            let mut tick = interval(TICK_PERIOD);
            tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
            tick.tick().await; // first tick completes immediately
            loop {
                tokio::select! {
                    () = cancel.cancelled() => break,
                    _ = tick.tick() => {
                        let elapsed = started.elapsed();
                        let mut board = board.lock().unwrap();
                        match board.sessions.get_mut(&id) {
                            Some(session)
                                if session.generation == generation
                                    && session.phase == PingPhase::Pinging =>
                            {
                                session.elapsed = elapsed;
                                session.message =
                                    format!("Pinging... ({:.1}s)", elapsed.as_secs_f64());
                            }
                            // Superseded or resolved between ticks.
                            _ => break,
                        }
                    }
                }
            }
        });
    }

    fn spawn_probe(&self, id: i64, generation: u64, url: String, started: Instant) {
        let board = Arc::clone(&self.board);
        let probe = Arc::clone(&self.probe);
        self.handle.spawn(async move {
            let outcome = match probe.wake(&url).await {
                Ok(()) => WakeOutcome::Woken,
                Err(e) => {
                    // Best-effort wake: the request fired, which is all this
                    // flow promises, so a failed probe is not an error here.
                    warn!("Wake probe to {} failed: {}", url, e);
                    WakeOutcome::Sent
                }
            };
            let duration = started.elapsed();

            {
                let mut board = board.lock().unwrap();
                if board.current_generation(id) != generation {
                    debug!("Discarding stale ping resolution for server {}", id);
                    return;
                }
                if let Some(active) = board.active.remove(&id) {
                    active.cancel.cancel();
                }
                let seconds = duration.as_secs_f64();
                let message = match outcome {
                    WakeOutcome::Woken => format!("Server woken up! ({:.2}s)", seconds),
                    WakeOutcome::Sent => format!("Ping sent! ({:.2}s)", seconds),
                };
                info!(
                    "Ping for server {} resolved after {:.2}s ({:?})",
                    id, seconds, outcome
                );
                board.sessions.insert(
                    id,
                    PingSession {
                        phase: PingPhase::Resolved,
                        outcome: Some(outcome),
                        message,
                        timestamp: wall_clock(),
                        elapsed: duration,
                        generation,
                    },
                );
            }

            sleep(RESOLVED_DWELL).await;
            let mut board = board.lock().unwrap();
            if board.current_generation(id) == generation {
                board.sessions.remove(&id);
            }
        });
    }
}

impl Drop for PingManager {
    fn drop(&mut self) {
        let board = self.board.lock().unwrap();
        for active in board.active.values() {
            active.cancel.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::ProbeError;
    use async_trait::async_trait;
    use chrono::Utc;

    struct StubProbe {
        delay: Duration,
        fail: bool,
    }

    #[async_trait]
    impl WakeProbe for StubProbe {
        async fn wake(&self, url: &str) -> Result<(), ProbeError> {
            sleep(self.delay).await;
            if self.fail {
                Err(ProbeError::InvalidUrl(url.to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn manager(delay_ms: u64, fail: bool) -> PingManager {
        PingManager::new(
            Arc::new(StubProbe {
                delay: Duration::from_millis(delay_ms),
                fail,
            }),
            Handle::current(),
        )
    }

    fn record(id: i64) -> ServerRecord {
        ServerRecord {
            id,
            url: format!("https://app{}.example.com", id),
            name: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_updates_then_probe_resolves_to_woken() {
        let manager = manager(350, false);
        manager.start_ping(&record(1));

        let session = manager.session(1).unwrap();
        assert_eq!(session.phase, PingPhase::Pinging);
        assert_eq!(session.message, "Pinging...");
        assert!(manager.is_pinging(1));

        sleep(Duration::from_millis(250)).await;
        let session = manager.session(1).unwrap();
        assert_eq!(session.phase, PingPhase::Pinging);
        assert_eq!(session.message, "Pinging... (0.2s)");

        sleep(Duration::from_millis(200)).await;
        let session = manager.session(1).unwrap();
        assert_eq!(session.phase, PingPhase::Resolved);
        assert_eq!(session.outcome, Some(WakeOutcome::Woken));
        assert_eq!(session.message, "Server woken up! (0.35s)");
        assert!(!manager.is_pinging(1));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_probe_still_reports_ping_sent() {
        let manager = manager(120, true);
        manager.start_ping(&record(4));

        sleep(Duration::from_millis(200)).await;
        let session = manager.session(4).unwrap();
        assert_eq!(session.phase, PingPhase::Resolved);
        assert_eq!(session.outcome, Some(WakeOutcome::Sent));
        assert_eq!(session.message, "Ping sent! (0.12s)");
    }

    #[tokio::test(start_paused = true)]
    async fn resolved_session_is_removed_after_dwell() {
        let manager = manager(100, false);
        manager.start_ping(&record(2));

        sleep(Duration::from_millis(150)).await;
        assert_eq!(manager.session(2).unwrap().phase, PingPhase::Resolved);

        // Just short of the dwell deadline the entry is still there.
        sleep(Duration::from_millis(5900)).await;
        assert!(manager.session(2).is_some());

        sleep(Duration::from_millis(100)).await;
        assert!(manager.session(2).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn supersession_discards_the_stale_resolution() {
        let manager = manager(500, false);
        manager.start_ping(&record(3));

        sleep(Duration::from_millis(100)).await;
        manager.start_ping(&record(3));

        // t=550: the first probe settled at t=500 but belongs to a stale
        // generation; the second is still pinging and its elapsed time is
        // measured from the second start.
        sleep(Duration::from_millis(450)).await;
        let session = manager.session(3).unwrap();
        assert_eq!(session.phase, PingPhase::Pinging);
        assert_eq!(session.message, "Pinging... (0.4s)");
        assert!(manager.is_pinging(3));

        sleep(Duration::from_millis(100)).await;
        let session = manager.session(3).unwrap();
        assert_eq!(session.phase, PingPhase::Resolved);
        assert_eq!(session.message, "Server woken up! (0.50s)");

        // The stale generation's dwell timer must not remove the entry early,
        // and the live one must.
        sleep(Duration::from_secs(6)).await;
        assert!(manager.session(3).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_is_monotone_while_pinging() {
        let manager = manager(1000, false);
        manager.start_ping(&record(5));

        let mut previous = Duration::ZERO;
        for _ in 0..8 {
            sleep(Duration::from_millis(100)).await;
            let session = manager.session(5).unwrap();
            assert_eq!(session.phase, PingPhase::Pinging);
            assert!(session.elapsed >= previous);
            previous = session.elapsed;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn sessions_for_different_ids_are_independent() {
        let manager = manager(300, false);
        manager.start_ping(&record(1));
        sleep(Duration::from_millis(150)).await;
        manager.start_ping(&record(2));

        // t=350: the first session has resolved, the second still ticks.
        sleep(Duration::from_millis(200)).await;
        assert_eq!(manager.session(1).unwrap().phase, PingPhase::Resolved);
        assert!(manager.is_pinging(2));
        assert_eq!(manager.session(2).unwrap().phase, PingPhase::Pinging);

        sleep(Duration::from_millis(150)).await;
        assert_eq!(manager.session(2).unwrap().phase, PingPhase::Resolved);
    }
}
