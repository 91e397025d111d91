// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::Utc;

fn status(name: &str, ready: bool, reason: &str, suspended: bool) -> FluxResourceStatus {
    FluxResourceStatus {
        cluster: "c1".to_string(),
        namespace: "flux-system".to_string(),
        name: name.to_string(),
        kind: "Kustomization".to_string(),
        ready,
        reason: reason.to_string(),
        message: "detail".to_string(),
        revision: "main@sha1:abc".to_string(),
        suspended,
        deleted: false,
        last_transition: Utc::now(),
        last_seen: Utc::now(),
    }
}

#[test]
fn summary_counts_by_priority_suspended_then_ready_then_failed_then_unknown() {
    let mut state = TrackerState::new("c1".to_string(), "https://c1".to_string());
    state.apply_poll(vec![
        status("a", true, "", false),
        status("b", false, "Failed", false),
        status("c", false, "", true),
    ]);

    let summary = state.summary();
    assert_eq!(summary, ClusterSummary { ready: 1, failed: 1, suspended: 1, unknown: 0, total: 3 });
}

#[test]
fn tombstoned_resource_is_marked_deleted_on_next_poll() {
    let mut state = TrackerState::new("c1".to_string(), "https://c1".to_string());
    state.apply_poll(vec![status("a", true, "", false)]);
    assert_eq!(state.resources.len(), 1);

    state.apply_poll(vec![]);
    assert_eq!(state.resources.len(), 1);
    let key = state.resources.keys().next().unwrap().clone();
    assert!(state.resources[&key].deleted);
    assert_eq!(state.summary().total, 0);
}

#[test]
fn alerts_exclude_suspended_and_deleted_resources() {
    let mut state = TrackerState::new("c1".to_string(), "https://c1".to_string());
    state.apply_poll(vec![
        status("not-ready", false, "Failed", false),
        status("suspended", false, "", true),
        status("ready", true, "", false),
    ]);

    let alerts = state.alerts();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].id, "flux-not-ready:c1/flux-system/not-ready");
    assert_eq!(alerts[0].severity, "error");
}

#[test]
fn record_poll_failure_increments_counter() {
    let mut state = TrackerState::new("c1".to_string(), "https://c1".to_string());
    assert_eq!(state.poll_failures, 0);
    state.record_poll_failure();
    assert_eq!(state.poll_failures, 1);
}

#[test]
fn unready_resource_with_empty_reason_counts_as_unknown() {
    let mut state = TrackerState::new("c1".to_string(), "https://c1".to_string());
    state.apply_poll(vec![status("a", false, "", false)]);
    assert_eq!(state.summary().unknown, 1);
}
