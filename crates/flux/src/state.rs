// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `TrackerState` — the value FluxTracker carries across restarts (spec §3).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use swarm_core::{Alert, ClusterSummary, FluxResourceStatus, ResourceKey, SourceClass};

/// Per-cluster state carried by FluxTracker across continue-as-new
/// boundaries and process restarts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerState {
    pub cluster: String,
    pub endpoint: String,
    pub resources: BTreeMap<ResourceKey, FluxResourceStatus>,
    /// Poll failures since this task started, a diagnostic sibling of the
    /// `summary`/`alerts` queries — not a new alert, purely observability.
    #[serde(default)]
    pub poll_failures: u64,
}

impl TrackerState {
    pub fn new(cluster: String, endpoint: String) -> Self {
        Self { cluster, endpoint, resources: BTreeMap::new(), poll_failures: 0 }
    }

    pub fn record_poll_failure(&mut self) {
        self.poll_failures += 1;
    }

    /// Upsert every status returned by a poll, then tombstone any
    /// pre-existing key absent from this poll's result (spec §4.4).
    pub fn apply_poll(&mut self, polled: Vec<FluxResourceStatus>) {
        let seen: std::collections::BTreeSet<ResourceKey> =
            polled.iter().map(ResourceKey::of).collect();

        for status in polled {
            let key = ResourceKey::of(&status);
            self.resources.insert(key, status);
        }

        for (key, status) in self.resources.iter_mut() {
            if !seen.contains(key) && !status.deleted {
                status.deleted = true;
            }
        }
    }

    /// Counts excluding tombstoned resources (spec §4.4 `summary`).
    pub fn summary(&self) -> ClusterSummary {
        let mut summary = ClusterSummary::default();
        for status in self.resources.values() {
            if status.deleted {
                continue;
            }
            summary.total += 1;
            // Suspended is checked before ready/failed/unknown, matching
            // the priority order this was distilled from.
            if status.suspended {
                summary.suspended += 1;
            } else if status.ready {
                summary.ready += 1;
            } else if !status.reason.is_empty() {
                summary.failed += 1;
            } else {
                summary.unknown += 1;
            }
        }
        summary
    }

    /// One synthetic "not ready" alert per resource that is unready, not
    /// suspended, and not tombstoned (spec §4.4 `alerts`).
    pub fn alerts(&self) -> Vec<Alert> {
        self.resources
            .values()
            .filter(|s| !s.ready && !s.suspended && !s.deleted)
            .map(|s| Alert {
                id: format!("flux-not-ready:{}/{}/{}", s.cluster, s.namespace, s.name),
                source: SourceClass::FluxReconciler,
                detector: "flux-not-ready".to_string(),
                severity: "error".to_string(),
                cluster: s.cluster.clone(),
                namespace: s.namespace.clone(),
                kind: s.kind.clone(),
                name: s.name.clone(),
                message: format!("{}: {}", s.reason, s.message),
                count: 1,
                first_seen: s.last_transition,
                last_seen: s.last_seen,
                resolved: false,
                resolved_at: None,
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
