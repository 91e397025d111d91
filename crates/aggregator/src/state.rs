// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `AggregatorState` — the value AlertAggregator carries across restarts
//! (spec §3, §4.5).

use std::collections::VecDeque;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use swarm_core::Alert;

/// Bounded FIFO cap on resolved-alert history (spec §4.5, §5 Backpressure).
pub const MAX_ALERT_HISTORY: usize = 200;

/// Global aggregator state: the active alert set (deduped by ID, insertion
/// order preserved) and the bounded resolved-alert history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregatorState {
    pub active: IndexMap<String, Alert>,
    pub history: VecDeque<Alert>,
}

impl AggregatorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one incoming alert signal (spec §4.5): dedup by ID, updating
    /// only `count`/`last_seen`/`message` in place on an existing entry —
    /// `resolved` is frozen at whatever the entry held on first insert, a
    /// quirk preserved exactly from the system this was distilled from.
    pub fn apply_alert(&mut self, alert: Alert) {
        if let Some(existing) = self.active.get_mut(&alert.id) {
            existing.count = alert.count;
            existing.last_seen = alert.last_seen;
            existing.message = alert.message;
        } else {
            self.active.insert(alert.id.clone(), alert);
        }
    }

    /// Continue-as-new boundary (spec §4.5): partition `active` by
    /// `resolved`, append resolved entries to `history`, trim history FIFO
    /// to [`MAX_ALERT_HISTORY`].
    pub fn age_resolved(&mut self) {
        let mut remaining = IndexMap::new();
        for (id, alert) in std::mem::take(&mut self.active) {
            if alert.resolved {
                self.history.push_back(alert);
            } else {
                remaining.insert(id, alert);
            }
        }
        self.active = remaining;

        while self.history.len() > MAX_ALERT_HISTORY {
            self.history.pop_front();
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
