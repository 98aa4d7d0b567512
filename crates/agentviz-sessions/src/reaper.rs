use std::time::Duration;

use chrono::Utc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::config::RegistryConfig;
use crate::registry::{lock_registry, SharedRegistry};

const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

/// Periodic sweep that removes idle sessions.
///
/// Each sweep takes the registry lock once and reaps through
/// `remove_session`, so it never interleaves with a record being handled.
/// Dropping the reaper without calling [`stop`](Self::stop) aborts the task.
#[derive(Debug)]
pub struct TtlReaper {
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl TtlReaper {
    /// Spawn the sweep task on the current tokio runtime.
    pub fn start(registry: SharedRegistry, config: RegistryConfig) -> Self {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
        let period = config.sweep_interval.max(MIN_SWEEP_INTERVAL);
        let ttl = config.ttl;

        info!(
            ttl = %humantime_serde::re::humantime::format_duration(ttl),
            sweep_interval = %humantime_serde::re::humantime::format_duration(period),
            "Starting session reaper"
        );

        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {
                        let reaped = sweep(&registry, ttl);
                        if reaped > 0 {
                            debug!(reaped, "Sweep removed idle sessions");
                        }
                    }
                }
            }
            debug!("Session reaper stopped");
        });

        Self {
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    /// Stop the timer and wait for the task to finish.
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for TtlReaper {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// One sweep; returns the number of sessions removed.
pub fn sweep(registry: &SharedRegistry, ttl: Duration) -> usize {
    lock_registry(registry).reap_idle(Utc::now(), ttl).len()
}
