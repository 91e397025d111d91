// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Detector-local [`AlertEntry`] records and the aggregator's canonical
//! [`Alert`] (spec §3).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::window::EventWindow;

/// A currently-firing detection, internal to [`DetectorState`]. Keyed by
/// `(detector, cluster, namespace, name)`; exactly one entry per key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEntry {
    pub detector: String,
    pub cluster: String,
    pub namespace: String,
    pub kind: String,
    pub name: String,
    pub message: String,
    pub count: i64,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

/// Per-cluster health-detector state: sliding windows keyed by pod and by
/// owner, plus the active alert map. Owned by `EventWatcher`; carried
/// across restarts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectorState {
    pub pod_windows: std::collections::BTreeMap<String, EventWindow>,
    pub owner_windows: std::collections::BTreeMap<String, EventWindow>,
    pub active_alerts: std::collections::BTreeMap<String, AlertEntry>,
}

impl DetectorState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Source class recorded on the aggregator's canonical [`Alert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceClass {
    ClusterHealth,
    FluxReconciler,
}

impl SourceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceClass::ClusterHealth => "cluster-health",
            SourceClass::FluxReconciler => "flux-reconciler",
        }
    }
}

/// The aggregator's canonical, inter-component alert record (spec §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub source: SourceClass,
    pub detector: String,
    pub severity: String,
    pub cluster: String,
    pub namespace: String,
    pub kind: String,
    pub name: String,
    pub message: String,
    pub count: i64,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub resolved: bool,
    pub resolved_at: Option<DateTime<Utc>>,
}
