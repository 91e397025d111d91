// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sliding time window used by the health detectors to count recent events.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A sliding window of timestamps, pruned lazily on [`EventWindow::count`].
///
/// Timestamps are expected to arrive in non-decreasing order, which is why
/// pruning only ever has to drop a contiguous prefix — see the module-level
/// invariant recorded in spec §4.1. Out-of-order arrivals simply tighten the
/// window early; they are never sorted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventWindow {
    window: chrono::Duration,
    timestamps: Vec<DateTime<Utc>>,
}

impl EventWindow {
    pub fn new(window: Duration) -> Self {
        Self {
            window: chrono::Duration::from_std(window).unwrap_or(chrono::Duration::zero()),
            timestamps: Vec::new(),
        }
    }

    /// Append a timestamp. Pruning only happens in [`EventWindow::count`].
    pub fn add(&mut self, t: DateTime<Utc>) {
        self.timestamps.push(t);
    }

    /// Prune timestamps older than `now - window`, returning the remaining
    /// count.
    pub fn count(&mut self, now: DateTime<Utc>) -> usize {
        self.prune(now);
        self.timestamps.len()
    }

    /// The most recently added timestamp still retained, or the zero
    /// instant (Unix epoch) if the window holds nothing.
    pub fn last_seen(&self) -> DateTime<Utc> {
        self.timestamps
            .last()
            .copied()
            .unwrap_or_else(|| DateTime::from_naive_utc_and_offset(NaiveDateTime::UNIX_EPOCH, Utc))
    }

    fn prune(&mut self, now: DateTime<Utc>) {
        let cutoff = now - self.window;
        let drop = self.timestamps.iter().take_while(|t| **t < cutoff).count();
        if drop > 0 {
            self.timestamps.drain(..drop);
        }
    }
}

#[cfg(test)]
#[path = "window_tests.rs"]
mod tests;
