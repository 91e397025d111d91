// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `WatcherState` — the value EventWatcher carries across restarts (spec §3).

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use swarm_core::{ClusterEvent, DetectorState};

/// Recent-events ring cap (spec §4.3, §5 Backpressure): 200, trim-on-append.
pub const MAX_BUFFER_SIZE: usize = 200;

/// Per-cluster state carried by EventWatcher across continue-as-new
/// boundaries and process restarts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatcherState {
    pub cluster: String,
    pub endpoint: String,
    pub resource_version: Option<String>,
    pub detector_state: DetectorState,
    pub recent_events: VecDeque<ClusterEvent>,
    /// Poll failures since this task started, a diagnostic sibling of
    /// `health-alerts` — not a new alert, purely observability.
    #[serde(default)]
    pub poll_failures: u64,
}

impl WatcherState {
    pub fn new(cluster: String, endpoint: String) -> Self {
        Self {
            cluster,
            endpoint,
            resource_version: None,
            detector_state: DetectorState::new(),
            recent_events: VecDeque::new(),
            poll_failures: 0,
        }
    }

    /// Append `event`, trimming the ring to [`MAX_BUFFER_SIZE`] oldest-first.
    pub fn push_event(&mut self, event: ClusterEvent) {
        self.recent_events.push_back(event);
        while self.recent_events.len() > MAX_BUFFER_SIZE {
            self.recent_events.pop_front();
        }
    }

    pub fn record_poll_failure(&mut self) {
        self.poll_failures += 1;
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
