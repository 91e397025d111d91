// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! EventWatcher — the per-cluster durable task described in spec §4.3.
//!
//! Implemented as a plain async loop rather than a literally-replayed
//! workflow (see SPEC_FULL.md §5/§9): every applied mutation is appended to
//! a [`Wal`] before the loop continues, and a [`Snapshot`] is written at
//! each continue-as-new boundary (every [`MAX_POLL_ITERATIONS`]
//! iterations), so a crash between snapshots replays only the WAL tail
//! instead of losing state.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use kube::Client;
use swarm_adapters::PollKubeEventsActivity;
use swarm_core::{detect_all, resolve_stale_alerts, Alert, AlertEntry, Clock, SourceClass};
use swarm_runtime::{activity, load_snapshot, save_snapshot, Queryable, Snapshot, SignalSender, Wal};
use tokio_util::sync::CancellationToken;

use crate::error::WatcherError;
use crate::state::WatcherState;

/// Poll iterations per execution before a continue-as-new boundary
/// (spec §4.3).
pub const MAX_POLL_ITERATIONS: u32 = 30;
/// Durable sleep between poll iterations (spec §4.3).
pub const POLL_INTERVAL: Duration = Duration::from_secs(10);

const SCHEMA_VERSION: u32 = 1;

/// The EventWatcher durable task for one cluster, generic over the clock so
/// tests can drive detector timestamps exactly (spec §5 "durable time").
pub struct EventWatcher<C: Clock> {
    client: Client,
    cluster: String,
    queryable: Queryable<WatcherState>,
    wal: Wal<WatcherState>,
    snapshot_path: PathBuf,
    clock: C,
    alert_tx: SignalSender<Alert>,
}

impl<C: Clock> EventWatcher<C> {
    /// Restore state from the last snapshot plus any WAL tail, or start
    /// fresh if this cluster has never run before.
    pub fn bootstrap(
        client: Client,
        cluster: String,
        endpoint: String,
        data_dir: &Path,
        clock: C,
        alert_tx: SignalSender<Alert>,
    ) -> Result<Self, WatcherError> {
        let snapshot_path = data_dir.join(format!("cluster-watch-{cluster}.snapshot.json"));
        let wal_path = data_dir.join(format!("cluster-watch-{cluster}.wal.log"));

        let restored = load_snapshot::<WatcherState>(&snapshot_path, SCHEMA_VERSION)?;
        let mut state = restored
            .map(|s| s.state)
            .unwrap_or_else(|| WatcherState::new(cluster.clone(), endpoint.clone()));

        let wal: Wal<WatcherState> = Wal::open(&wal_path)?;
        // Each WAL entry stores the full post-mutation state; replaying
        // means taking the last one, since mutations aren't incremental.
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

    /// A cheap handle the gateway can clone to answer `recent-events` and
    /// `health-alerts` queries without touching the loop.
    pub fn queries(&self) -> Queryable<WatcherState> {
        self.queryable.clone()
    }

    /// Run until `cancel` fires. Never returns otherwise — each execution
    /// budget boundary folds into a fresh in-process execution rather than
    /// exiting.
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
                tracing::warn!(cluster = %self.cluster, error = %err, "failed to checkpoint watcher state");
            }
        }
    }

    async fn poll_once(&mut self) {
        let span = tracing::info_span!("watcher_poll", cluster = %self.cluster);
        let _enter = span.enter();

        let resource_version = self.queryable.with(|s| s.resource_version.clone());
        let poll = PollKubeEventsActivity {
            client: self.client.clone(),
            cluster: self.cluster.clone(),
            resource_version,
        };

        let result = match activity::run(&poll).await {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(cluster = %self.cluster, error = %err, "poll failed, cursor unchanged");
                let mut state = self.queryable.get();
                state.record_poll_failure();
                self.queryable.publish(state);
                return;
            }
        };

        let mut state = self.queryable.get();
        let before: BTreeMap<String, AlertEntry> = state.detector_state.active_alerts.clone();

        let events_processed = result.events.len();
        for event in result.events {
            let now = self.clock.now();
            detect_all(&event, &mut state.detector_state, now);
            state.push_event(event);
        }
        resolve_stale_alerts(&mut state.detector_state, self.clock.now());

        if let Some(rv) = result.resource_version {
            state.resource_version = Some(rv);
        }

        self.signal_alert_diff(&before, &state.detector_state.active_alerts);

        tracing::info!(
            cluster = %self.cluster,
            events_processed,
            active_alerts = state.detector_state.active_alerts.len(),
            "poll iteration complete"
        );

        if let Err(err) = self.wal.append(state.clone()) {
            tracing::warn!(cluster = %self.cluster, error = %err, "failed to append watcher WAL entry");
        }
        self.queryable.publish(state);
    }

    /// Diff the active-alert map before and after a poll batch and forward
    /// the changes to the aggregator (spec §2 data flow: "detector update →
    /// alert signal → AlertAggregator").
    fn signal_alert_diff(
        &self,
        before: &BTreeMap<String, AlertEntry>,
        after: &BTreeMap<String, AlertEntry>,
    ) {
        for alert in diff_alerts(before, after, self.clock.now()) {
            let _ = self.alert_tx.send(alert);
        }
    }

    fn checkpoint(&mut self) -> Result<(), WatcherError> {
        let state = self.queryable.get();
        let snapshot = Snapshot::new(SCHEMA_VERSION, state, self.clock.now());
        save_snapshot(&self.snapshot_path, &snapshot)?;
        self.wal.truncate()?;
        Ok(())
    }
}

/// Compute the signals to emit for a batch: an (un)resolved alert for every
/// entry that's new or changed, and a resolved alert for every entry that
/// was cleared by `ResolveStaleAlerts` since the last batch.
fn diff_alerts(
    before: &BTreeMap<String, AlertEntry>,
    after: &BTreeMap<String, AlertEntry>,
    now: chrono::DateTime<chrono::Utc>,
) -> Vec<Alert> {
    let mut alerts = Vec::new();
    for (id, entry) in after {
        if before.get(id) != Some(entry) {
            alerts.push(entry_to_alert(id, entry, false, None));
        }
    }
    for (id, entry) in before {
        if !after.contains_key(id) {
            alerts.push(entry_to_alert(id, entry, true, Some(now)));
        }
    }
    alerts
}

fn entry_to_alert(
    id: &str,
    entry: &AlertEntry,
    resolved: bool,
    resolved_at: Option<chrono::DateTime<chrono::Utc>>,
) -> Alert {
    Alert {
        id: id.to_string(),
        source: SourceClass::ClusterHealth,
        detector: entry.detector.clone(),
        severity: "warning".to_string(),
        cluster: entry.cluster.clone(),
        namespace: entry.namespace.clone(),
        kind: entry.kind.clone(),
        name: entry.name.clone(),
        message: entry.message.clone(),
        count: entry.count,
        first_seen: entry.first_seen,
        last_seen: entry.last_seen,
        resolved,
        resolved_at,
    }
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
