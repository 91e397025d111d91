// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stateful pattern matchers turning [`ClusterEvent`]s into [`AlertEntry`]
//! records (spec §4.2). Pure functions over [`DetectorState`] — no I/O, no
//! time reads; `now` is always supplied by the caller's [`Clock`].
//!
//! [`Clock`]: crate::Clock

use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::alert::{AlertEntry, DetectorState};
use crate::event::{ClusterEvent, Severity};
use crate::window::EventWindow;

pub const DETECTOR_CRASH_LOOP: &str = "crash-loop";
pub const DETECTOR_OOM_KILLED: &str = "oom-killed";
pub const DETECTOR_IMAGE_PULL: &str = "image-pull";
pub const DETECTOR_STUCK_ROLLOUT: &str = "stuck-rollout";

const CRASH_LOOP_WINDOW: Duration = Duration::from_secs(10 * 60);
const CRASH_LOOP_THRESHOLD: usize = 3;
const IMAGE_PULL_WINDOW: Duration = Duration::from_secs(5 * 60);
const IMAGE_PULL_THRESHOLD: usize = 3;
const IMAGE_PULL_CLEAR: chrono::Duration = chrono::Duration::minutes(10);
const STUCK_WINDOW: Duration = Duration::from_secs(15 * 60);
const STUCK_THRESHOLD: usize = 5;
const OOM_CLEAR: chrono::Duration = chrono::Duration::minutes(10);

fn pod_key(detector: &str, ev: &ClusterEvent) -> String {
    format!("{}:{}/{}/{}", detector, ev.cluster, ev.namespace, ev.name)
}

fn alert_id(detector: &str, ev: &ClusterEvent) -> String {
    pod_key(detector, ev)
}

fn effective_ts(ev: &ClusterEvent, now: DateTime<Utc>) -> DateTime<Utc> {
    if ev.last_seen.timestamp() == 0 {
        now
    } else {
        ev.last_seen
    }
}

/// `reason == "BackOff"` AND `severity == Warning`, window 10m, threshold 3.
pub fn detect_crash_loop(ev: &ClusterEvent, state: &mut DetectorState, now: DateTime<Utc>) {
    if ev.reason != "BackOff" || ev.severity != Severity::Warning {
        return;
    }

    let key = pod_key(DETECTOR_CRASH_LOOP, ev);
    let window = state.pod_windows.entry(key).or_insert_with(|| EventWindow::new(CRASH_LOOP_WINDOW));
    let ts = effective_ts(ev, now);
    window.add(ts);
    let count = window.count(now);

    let id = alert_id(DETECTOR_CRASH_LOOP, ev);
    if let Some(existing) = state.active_alerts.get_mut(&id) {
        existing.count = count as i64;
        existing.last_seen = ts;
        return;
    }

    if count >= CRASH_LOOP_THRESHOLD {
        state.active_alerts.insert(
            id,
            AlertEntry {
                detector: DETECTOR_CRASH_LOOP.to_string(),
                cluster: ev.cluster.clone(),
                namespace: ev.namespace.clone(),
                kind: ev.kind.clone(),
                name: ev.name.clone(),
                message: format!(
                    "Pod {}/{} in CrashLoopBackOff ({} restarts in {}m)",
                    ev.namespace,
                    ev.name,
                    count,
                    CRASH_LOOP_WINDOW.as_secs() / 60
                ),
                count: count as i64,
                first_seen: ts,
                last_seen: ts,
            },
        );
    }
}

/// `reason` contains `"OOM"`, no window, fires on the first matching event,
/// count is a monotonically increasing counter (not a window count — see
/// spec §9 open question).
pub fn detect_oom_killed(ev: &ClusterEvent, state: &mut DetectorState, now: DateTime<Utc>) {
    if !ev.reason.contains("OOM") {
        return;
    }

    let ts = effective_ts(ev, now);
    let id = alert_id(DETECTOR_OOM_KILLED, ev);

    if let Some(existing) = state.active_alerts.get_mut(&id) {
        existing.count += 1;
        existing.last_seen = ts;
        return;
    }

    state.active_alerts.insert(
        id,
        AlertEntry {
            detector: DETECTOR_OOM_KILLED.to_string(),
            cluster: ev.cluster.clone(),
            namespace: ev.namespace.clone(),
            kind: ev.kind.clone(),
            name: ev.name.clone(),
            message: format!("Pod {}/{} OOMKilled", ev.namespace, ev.name),
            count: 1,
            first_seen: ts,
            last_seen: ts,
        },
    );
}

/// `reason == "Failed"` AND message contains `"ImagePullBackOff"` or
/// `"ErrImagePull"`, window 5m, threshold 3.
pub fn detect_image_pull(ev: &ClusterEvent, state: &mut DetectorState, now: DateTime<Utc>) {
    if ev.reason != "Failed" {
        return;
    }
    if !ev.message.contains("ImagePullBackOff") && !ev.message.contains("ErrImagePull") {
        return;
    }

    let key = pod_key(DETECTOR_IMAGE_PULL, ev);
    let window = state.pod_windows.entry(key).or_insert_with(|| EventWindow::new(IMAGE_PULL_WINDOW));
    let ts = effective_ts(ev, now);
    window.add(ts);
    let count = window.count(now);

    let id = alert_id(DETECTOR_IMAGE_PULL, ev);
    if let Some(existing) = state.active_alerts.get_mut(&id) {
        existing.count = count as i64;
        existing.last_seen = ts;
        return;
    }

    if count >= IMAGE_PULL_THRESHOLD {
        state.active_alerts.insert(
            id,
            AlertEntry {
                detector: DETECTOR_IMAGE_PULL.to_string(),
                cluster: ev.cluster.clone(),
                namespace: ev.namespace.clone(),
                kind: ev.kind.clone(),
                name: ev.name.clone(),
                message: format!(
                    "Pod {}/{} failing to pull image ({} failures in {}m)",
                    ev.namespace,
                    ev.name,
                    count,
                    IMAGE_PULL_WINDOW.as_secs() / 60
                ),
                count: count as i64,
                first_seen: ts,
                last_seen: ts,
            },
        );
    }
}

/// `reason ∈ {FailedCreate, FailedScheduling}` AND `kind ∈ {ReplicaSet,
/// Pod}`, window 15m, threshold 5. Windows are stored in the owner-scoped
/// mapping under the same `detector:cluster/ns/name` key scheme.
pub fn detect_stuck_rollout(ev: &ClusterEvent, state: &mut DetectorState, now: DateTime<Utc>) {
    if ev.reason != "FailedCreate" && ev.reason != "FailedScheduling" {
        return;
    }
    if ev.kind != "ReplicaSet" && ev.kind != "Pod" {
        return;
    }

    let key = pod_key(DETECTOR_STUCK_ROLLOUT, ev);
    let window = state.owner_windows.entry(key).or_insert_with(|| EventWindow::new(STUCK_WINDOW));
    let ts = effective_ts(ev, now);
    window.add(ts);
    let count = window.count(now);

    let id = alert_id(DETECTOR_STUCK_ROLLOUT, ev);
    if let Some(existing) = state.active_alerts.get_mut(&id) {
        existing.count = count as i64;
        existing.last_seen = ts;
        return;
    }

    if count >= STUCK_THRESHOLD {
        state.active_alerts.insert(
            id,
            AlertEntry {
                detector: DETECTOR_STUCK_ROLLOUT.to_string(),
                cluster: ev.cluster.clone(),
                namespace: ev.namespace.clone(),
                kind: ev.kind.clone(),
                name: ev.name.clone(),
                message: format!(
                    "{} {}/{} stuck ({} failures in {}m)",
                    ev.kind,
                    ev.namespace,
                    ev.name,
                    count,
                    STUCK_WINDOW.as_secs() / 60
                ),
                count: count as i64,
                first_seen: ts,
                last_seen: ts,
            },
        );
    }
}

/// Run every detector against a single event, then clear resolved alerts.
/// This is the per-event pipeline EventWatcher runs for each item in a poll
/// batch (spec §4.3).
pub fn detect_all(ev: &ClusterEvent, state: &mut DetectorState, now: DateTime<Utc>) {
    detect_crash_loop(ev, state, now);
    detect_oom_killed(ev, state, now);
    detect_image_pull(ev, state, now);
    detect_stuck_rollout(ev, state, now);
}

/// Iterate active alerts and delete per the detector's clear policy,
/// removing the backing window along with the alert.
pub fn resolve_stale_alerts(state: &mut DetectorState, now: DateTime<Utc>) {
    let ids: Vec<String> = state.active_alerts.keys().cloned().collect();
    for id in ids {
        let Some(alert) = state.active_alerts.get(&id) else { continue };
        let detector = alert.detector.clone();
        let should_clear = match detector.as_str() {
            DETECTOR_CRASH_LOOP => {
                let key = id.clone();
                match state.pod_windows.get_mut(&key) {
                    Some(w) => w.count(now) == 0,
                    None => true,
                }
            }
            DETECTOR_OOM_KILLED => now.signed_duration_since(alert.last_seen) > OOM_CLEAR,
            DETECTOR_IMAGE_PULL => {
                let key = id.clone();
                match state.pod_windows.get(&key) {
                    Some(w) => now.signed_duration_since(w.last_seen()) > IMAGE_PULL_CLEAR,
                    None => true,
                }
            }
            DETECTOR_STUCK_ROLLOUT => {
                let key = id.clone();
                match state.owner_windows.get_mut(&key) {
                    Some(w) => w.count(now) == 0,
                    None => true,
                }
            }
            _ => false,
        };

        if should_clear {
            state.active_alerts.remove(&id);
            match detector.as_str() {
                DETECTOR_CRASH_LOOP => {
                    state.pod_windows.remove(&id);
                }
                DETECTOR_IMAGE_PULL => {
                    state.pod_windows.remove(&id);
                }
                DETECTOR_STUCK_ROLLOUT => {
                    state.owner_windows.remove(&id);
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
#[path = "detectors_tests.rs"]
mod tests;
