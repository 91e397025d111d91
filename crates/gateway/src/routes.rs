// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP handlers for the five routes in spec §4.7. Every handler reads a
//! [`Queryable`](swarm_runtime::Queryable) snapshot directly — no request
//! here ever touches a durable task's own loop or WAL.

use axum::extract::State;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/clusters", get(clusters))
        .route("/api/alerts", get(alerts))
        .route("/api/flux", get(flux))
        .route("/api/workflows", get(workflows))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

/// `clusters[]` entry enriched with the per-cluster poll-failure counters —
/// a diagnostic sibling of the health-alerts/summary queries, not a new
/// alert (SPEC_FULL.md §4.3/§4.4).
#[derive(Serialize)]
struct ClusterStatus {
    name: String,
    endpoint: String,
    #[serde(rename = "watcherPollFailures")]
    watcher_poll_failures: u64,
    #[serde(rename = "fluxPollFailures")]
    flux_poll_failures: u64,
}

async fn clusters(State(state): State<AppState>) -> Json<Value> {
    let out: Vec<ClusterStatus> = state
        .clusters
        .iter()
        .map(|cluster| ClusterStatus {
            name: cluster.name.clone(),
            endpoint: cluster.endpoint.clone(),
            watcher_poll_failures: state
                .watchers
                .get(&cluster.name)
                .map(|w| w.with(|s| s.poll_failures))
                .unwrap_or(0),
            flux_poll_failures: state
                .flux_trackers
                .get(&cluster.name)
                .map(|t| t.with(|s| s.poll_failures))
                .unwrap_or(0),
        })
        .collect();
    Json(json!(out))
}

async fn alerts(State(state): State<AppState>) -> Json<Value> {
    let active: Vec<_> = state.aggregator.with(|s| s.active.values().cloned().collect());
    Json(json!(active))
}

#[derive(Serialize)]
struct FluxClusterData {
    ready: usize,
    failed: usize,
    suspended: usize,
    total: usize,
    resources: Vec<swarm_core::FluxResourceStatus>,
}

async fn flux(State(state): State<AppState>) -> Json<Value> {
    let mut out: BTreeMap<String, FluxClusterData> = BTreeMap::new();
    for cluster in &state.clusters {
        let Some(queryable) = state.flux_trackers.get(&cluster.name) else {
            // No tracker for this cluster (yet); never block the response
            // on it, just report a zero summary.
            out.insert(
                cluster.name.clone(),
                FluxClusterData { ready: 0, failed: 0, suspended: 0, total: 0, resources: vec![] },
            );
            continue;
        };
        let (summary, resources) = queryable.with(|tracker| {
            (tracker.summary(), tracker.resources.values().cloned().collect())
        });
        out.insert(
            cluster.name.clone(),
            FluxClusterData {
                ready: summary.ready,
                failed: summary.failed,
                suspended: summary.suspended,
                total: summary.total,
                resources,
            },
        );
    }
    Json(json!(out))
}

#[derive(Serialize)]
struct WorkflowInfo {
    id: String,
    #[serde(rename = "type")]
    kind: &'static str,
    running: bool,
    #[serde(rename = "startedAt", skip_serializing_if = "Option::is_none")]
    started_at: Option<chrono::DateTime<chrono::Utc>>,
}

async fn workflows(State(state): State<AppState>) -> Json<Value> {
    let out: Vec<WorkflowInfo> = state
        .workflows
        .iter()
        .map(|wf| WorkflowInfo {
            id: wf.id.clone(),
            kind: wf.kind,
            running: !wf.cancel.is_cancelled(),
            started_at: Some(wf.started_at),
        })
        .collect();
    Json(json!(out))
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
