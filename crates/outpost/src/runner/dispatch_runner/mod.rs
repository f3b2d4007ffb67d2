/*
 *  Copyright 2025-2026 Colliery Software
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

//! Dispatch runner: a single periodic timer driving dispatch cycles.
//!
//! One background task owns the timer. Cycles run strictly sequentially;
//! a tick that fires while a cycle is still in flight is skipped rather
//! than queued, so a slow endpoint delays dispatch instead of stacking
//! concurrent cycles. The pause flag is consulted once per tick, which
//! means a toggle takes effect on the next tick, never mid-cycle.

pub mod config;

use crate::dal::DAL;
use crate::database::Database;
use crate::dispatcher::DispatchCycle;
use crate::runner::DispatchRunnerConfig;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

/// Process-wide pause flag for dispatch.
///
/// Cloning hands out another handle to the same flag, so the control
/// endpoint and the runner observe one shared state. A freshly created
/// flag is always unpaused; the state does not survive a restart.
#[derive(Debug, Clone, Default)]
pub struct PauseControl {
    paused: Arc<AtomicBool>,
}

impl PauseControl {
    /// Creates a new unpaused flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if dispatch is currently paused.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Flips the flag and returns the new state.
    pub fn toggle(&self) -> bool {
        !self.paused.fetch_xor(true, Ordering::SeqCst)
    }
}

/// Periodic dispatch runner.
///
/// Created through [`DispatchRunner::builder()`]; the timer loop starts as
/// soon as `build()` succeeds and keeps firing until [`shutdown`] is
/// called. The first cycle runs one full tick after startup.
///
/// [`shutdown`]: DispatchRunner::shutdown
pub struct DispatchRunner {
    database: Database,
    config: DispatchRunnerConfig,
    pause: PauseControl,
    shutdown: Arc<AtomicBool>,
    shutdown_notify: Arc<Notify>,
    loop_handle: Mutex<Option<JoinHandle<()>>>,
}

impl DispatchRunner {
    /// Creates a builder for wiring up a runner.
    pub fn builder() -> config::DispatchRunnerBuilder {
        config::DispatchRunnerBuilder::new()
    }

    /// Spawns the timer loop and returns the running instance.
    pub(super) fn start(
        database: Database,
        runner_config: DispatchRunnerConfig,
        cycle: DispatchCycle,
        pause: PauseControl,
    ) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_notify = Arc::new(Notify::new());

        let loop_shutdown = shutdown.clone();
        let loop_notify = shutdown_notify.clone();
        let loop_pause = pause.clone();
        let tick = runner_config.tick_interval();

        let handle = tokio::spawn(async move {
            let mut interval =
                tokio::time::interval_at(tokio::time::Instant::now() + tick, tick);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                if loop_shutdown.load(Ordering::SeqCst) {
                    break;
                }

                tokio::select! {
                    _ = interval.tick() => {
                        if loop_shutdown.load(Ordering::SeqCst) {
                            break;
                        }
                        if loop_pause.is_paused() {
                            debug!("Dispatch is paused, skipping this tick");
                            continue;
                        }
                        match cycle.run().await {
                            Ok(stats) if stats.selected == 0 => {
                                debug!("Dispatch cycle complete: nothing pending");
                            }
                            Ok(stats) => {
                                info!(
                                    "Dispatch cycle complete: selected={} delivered={} rejected={} unreachable={} committed={}",
                                    stats.selected,
                                    stats.delivered,
                                    stats.rejected,
                                    stats.unreachable,
                                    stats.committed
                                );
                            }
                            Err(e) => {
                                error!("Dispatch cycle failed, will retry next tick: {}", e);
                            }
                        }
                    }
                    _ = loop_notify.notified() => {}
                }
            }

            debug!("Dispatch loop stopped");
        });

        Self {
            database,
            config: runner_config,
            pause,
            shutdown,
            shutdown_notify,
            loop_handle: Mutex::new(Some(handle)),
        }
    }

    /// Returns a DAL over the runner's database.
    pub fn dal(&self) -> DAL {
        DAL::new(self.database.clone())
    }

    /// Returns the runner's database handle.
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &DispatchRunnerConfig {
        &self.config
    }

    /// Returns a handle to the pause flag.
    pub fn pause_control(&self) -> PauseControl {
        self.pause.clone()
    }

    /// Stops the timer loop.
    ///
    /// If a cycle is in flight, waits for it to finish rather than cutting
    /// it off mid-batch. Safe to call more than once.
    pub async fn shutdown(&self) {
        info!("Shutting down dispatch runner");
        self.shutdown.store(true, Ordering::SeqCst);
        self.shutdown_notify.notify_waiters();

        let handle = self.loop_handle.lock().await.take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                error!("Dispatch loop task failed during shutdown: {}", e);
            }
        }
        info!("Dispatch runner stopped");
    }
}

impl Drop for DispatchRunner {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Ok(mut guard) = self.loop_handle.try_lock() {
            if let Some(handle) = guard.take() {
                handle.abort();
            }
        }
    }
}
