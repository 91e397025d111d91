// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The gateway's shared application state (spec §4.7): cheap clones of
//! every durable task's [`Queryable`] handle plus static cluster config,
//! read directly without routing through any task's own loop.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use swarm_aggregator::AggregatorState;
use swarm_flux::TrackerState;
use swarm_runtime::Queryable;
use swarm_watcher::WatcherState;
use tokio_util::sync::CancellationToken;

/// `{name, endpoint}` as read from `clusters[]` config (spec §6).
#[derive(Debug, Clone, Serialize)]
pub struct ClusterInfo {
    pub name: String,
    pub endpoint: String,
}

/// One known durable-task identity, tracked so `/api/workflows` can report
/// on it without a real workflow-engine `describe` call.
#[derive(Clone)]
pub struct WorkflowHandle {
    pub id: String,
    pub kind: &'static str,
    pub started_at: DateTime<Utc>,
    pub cancel: CancellationToken,
}

#[derive(Clone)]
pub struct AppState {
    pub clusters: Vec<ClusterInfo>,
    pub aggregator: Queryable<AggregatorState>,
    pub watchers: BTreeMap<String, Queryable<WatcherState>>,
    pub flux_trackers: BTreeMap<String, Queryable<TrackerState>>,
    pub workflows: Vec<WorkflowHandle>,
}
