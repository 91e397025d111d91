// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! FluxTracker — the per-cluster durable task described in spec §4.4.
//!
//! Same durability approach as `swarm-watcher`'s EventWatcher: WAL-backed
//! mutations, periodic snapshots at the continue-as-new boundary.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use kube::Client;
use swarm_adapters::PollFluxResourcesActivity;
use swarm_core::{Alert, Clock};
use swarm_runtime::{activity, load_snapshot, save_snapshot, Queryable, Snapshot, SignalSender, Wal};
use tokio_util::sync::CancellationToken;

use crate::error::FluxError;
use crate::state::TrackerState;

/// Poll iterations per execution before a continue-as-new boundary
/// (spec §4.4: ≈10 minutes per execution at a 30s sleep).
pub const MAX_POLL_ITERATIONS: u32 = 20;
/// Durable sleep between poll iterations (spec §4.4).
pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

const SCHEMA_VERSION: u32 = 1;

/// The FluxTracker durable task for one cluster.
pub struct FluxTracker<C: Clock> {
    client: Client,
    cluster: String,
    queryable: Queryable<TrackerState>,
    wal: Wal<TrackerState>,
    snapshot_path: PathBuf,
    clock: C,
    alert_tx: SignalSender<Alert>,
}

impl<C: Clock> FluxTracker<C> {
    pub fn bootstrap(
        client: Client,
        cluster: String,
        endpoint: String,
        data_dir: &Path,
        clock: C,
        alert_tx: SignalSender<Alert>,
    ) -> Result<Self, FluxError> {
        let snapshot_path = data_dir.join(format!("flux-watch-{cluster}.snapshot.json"));
        let wal_path = data_dir.join(format!("flux-watch-{cluster}.wal.log"));

        let restored = load_snapshot::<TrackerState>(&snapshot_path, SCHEMA_VERSION)?;
        let mut state = restored
            .map(|s| s.state)
            .unwrap_or_else(|| TrackerState::new(cluster.clone(), endpoint.clone()));

        let wal: Wal<TrackerState> = Wal::open(&wal_path)?;
        if let Some(last) = wal.read_all()?.into_iter().last() {
            state = last.event;
        }

        Ok(Self {
            client,
            cluster,
            queryable: Queryable::new(state),
            wal,
            snapshot_path,
            clock,
            alert_tx,
        })
    }

    /// A cheap handle the gateway can clone to answer `resources`,
    /// `summary`, and `alerts` queries without touching the loop.
    pub fn queries(&self) -> Queryable<TrackerState> {
        self.queryable.clone()
    }

    pub async fn run(mut self, cancel: CancellationToken) {
        loop {
            for _iteration in 0..MAX_POLL_ITERATIONS {
                if cancel.is_cancelled() {
                    return;
                }
                self.poll_once().await;

                tokio::select! {
                    _ = cancel.cancelled() => return,
                    _ = tokio::time::sleep(POLL_INTERVAL) => {}
                }
            }
            if let Err(err) = self.checkpoint() {
                tracing::warn!(cluster = %self.cluster, error = %err, "failed to checkpoint tracker state");
            }
        }
    }

    async fn poll_once(&mut self) {
        let span = tracing::info_span!("flux_poll", cluster = %self.cluster);
        let _enter = span.enter();

        let poll = PollFluxResourcesActivity { client: self.client.clone(), cluster: self.cluster.clone() };
        let resources = match activity::run(&poll).await {
            Ok(resources) => resources,
            Err(err) => {
                tracing::warn!(cluster = %self.cluster, error = %err, "flux poll failed");
                let mut state = self.queryable.get();
                state.record_poll_failure();
                self.queryable.publish(state);
                return;
            }
        };

        let mut state = self.queryable.get();
        let before = alerts_by_id(&state.alerts());
        state.apply_poll(resources);
        let after = alerts_by_id(&state.alerts());

        for alert in diff_alerts(&before, &after, self.clock.now()) {
            let _ = self.alert_tx.send(alert);
        }

        tracing::info!(
            cluster = %self.cluster,
            resources = state.resources.len(),
            "flux poll iteration complete"
        );

        if let Err(err) = self.wal.append(state.clone()) {
            tracing::warn!(cluster = %self.cluster, error = %err, "failed to append tracker WAL entry");
        }
        self.queryable.publish(state);
    }

    fn checkpoint(&mut self) -> Result<(), FluxError> {
        let state = self.queryable.get();
        let snapshot = Snapshot::new(SCHEMA_VERSION, state, self.clock.now());
        save_snapshot(&self.snapshot_path, &snapshot)?;
        self.wal.truncate()?;
        Ok(())
    }
}

fn alerts_by_id(alerts: &[Alert]) -> BTreeMap<String, Alert> {
    alerts.iter().cloned().map(|a| (a.id.clone(), a)).collect()
}

/// Signal a fresh/changed not-ready alert for every resource still failing,
/// and a resolved alert for every resource that has recovered since the
/// last poll.
fn diff_alerts(
    before: &BTreeMap<String, Alert>,
    after: &BTreeMap<String, Alert>,
    now: chrono::DateTime<chrono::Utc>,
) -> Vec<Alert> {
    let mut out = Vec::new();
    for (id, alert) in after {
        if before.get(id) != Some(alert) {
            out.push(alert.clone());
        }
    }
    for (id, alert) in before {
        if !after.contains_key(id) {
            let mut resolved = alert.clone();
            resolved.resolved = true;
            resolved.resolved_at = Some(now);
            out.push(resolved);
        }
    }
    out
}

#[cfg(test)]
#[path = "tracker_tests.rs"]
mod tests;
