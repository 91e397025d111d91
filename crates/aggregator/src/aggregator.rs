// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! AlertAggregator — the single cross-cluster durable task described in
//! spec §4.5. Unlike EventWatcher/FluxTracker it does not poll; it is
//! purely signal-driven, folding in every `Alert` sent by any cluster's
//! watcher or tracker and aging resolved alerts into history on a timer.

use std::path::{Path, PathBuf};
use std::time::Duration;

use swarm_core::{Alert, Clock};
use swarm_runtime::{load_snapshot, save_snapshot, Queryable, Snapshot, SignalReceiver, Wal};
use tokio_util::sync::CancellationToken;

use crate::error::AggregatorError;
use crate::state::AggregatorState;

/// Continue-as-new boundary: resolved alerts age out of `active` into
/// `history` on this interval (spec §4.5).
pub const CONTINUE_INTERVAL: Duration = Duration::from_secs(30 * 60);

const SCHEMA_VERSION: u32 = 1;

/// The single AlertAggregator durable task, shared across every cluster.
pub struct AlertAggregator<C: Clock> {
    queryable: Queryable<AggregatorState>,
    wal: Wal<AggregatorState>,
    snapshot_path: PathBuf,
    clock: C,
    alert_rx: SignalReceiver<Alert>,
}

impl<C: Clock> AlertAggregator<C> {
    pub fn bootstrap(
        data_dir: &Path,
        clock: C,
        alert_rx: SignalReceiver<Alert>,
    ) -> Result<Self, AggregatorError> {
        let snapshot_path = data_dir.join("alerts.snapshot.json");
        let wal_path = data_dir.join("alerts.wal.log");

        let restored = load_snapshot::<AggregatorState>(&snapshot_path, SCHEMA_VERSION)?;
        let mut state = restored.map(|s| s.state).unwrap_or_default();

        let wal: Wal<AggregatorState> = Wal::open(&wal_path)?;
        if let Some(last) = wal.read_all()?.into_iter().last() {
            state = last.event;
        }

        Ok(Self { queryable: Queryable::new(state), wal, snapshot_path, clock, alert_rx })
    }

    /// A cheap handle the gateway can clone to answer `active-alerts` and
    /// `alert-history` queries without touching the loop.
    pub fn queries(&self) -> Queryable<AggregatorState> {
        self.queryable.clone()
    }

    /// Run until `cancel` fires: fold in every signaled alert as it
    /// arrives, and age resolved alerts into history every
    /// [`CONTINUE_INTERVAL`].
    ///
    /// The continue-as-new timer is created once, outside the loop, and
    /// only reset after it actually fires — constructing it fresh inside
    /// `select!` on every iteration would let a steady stream of `alert`
    /// signals discard the in-flight sleep before it ever completes.
    pub async fn run(mut self, cancel: CancellationToken) {
        let mut deadline = Box::pin(tokio::time::sleep(CONTINUE_INTERVAL));
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    self.checkpoint_quiet();
                    return;
                }
                signal = self.alert_rx.recv() => {
                    match signal {
                        Some(alert) => self.apply_alert(alert),
                        None => {
                            // Every sender dropped; nothing more will ever
                            // arrive, but keep serving queries.
                            cancel.cancelled().await;
                            self.checkpoint_quiet();
                            return;
                        }
                    }
                }
                _ = &mut deadline => {
                    self.age_resolved();
                    deadline.as_mut().reset(tokio::time::Instant::now() + CONTINUE_INTERVAL);
                }
            }
        }
    }

    fn apply_alert(&mut self, alert: Alert) {
        let mut state = self.queryable.get();
        state.apply_alert(alert);

        if let Err(err) = self.wal.append(state.clone()) {
            tracing::warn!(error = %err, "failed to append aggregator WAL entry");
        }
        self.queryable.publish(state);
    }

    fn age_resolved(&mut self) {
        let mut state = self.queryable.get();
        state.age_resolved();

        if let Err(err) = self.wal.append(state.clone()) {
            tracing::warn!(error = %err, "failed to append aggregator WAL entry");
        }
        self.queryable.publish(state);

        if let Err(err) = self.checkpoint() {
            tracing::warn!(error = %err, "failed to checkpoint aggregator state");
        }
    }

    fn checkpoint(&mut self) -> Result<(), AggregatorError> {
        let state = self.queryable.get();
        let snapshot = Snapshot::new(SCHEMA_VERSION, state, self.clock.now());
        save_snapshot(&self.snapshot_path, &snapshot)?;
        self.wal.truncate()?;
        Ok(())
    }

    fn checkpoint_quiet(&mut self) {
        if let Err(err) = self.checkpoint() {
            tracing::warn!(error = %err, "failed to checkpoint aggregator state on shutdown");
        }
    }
}

#[cfg(test)]
#[path = "aggregator_tests.rs"]
mod tests;
