// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable time handling.
//!
//! Durable tasks must never read the wall clock directly (spec §5
//! "forbids wall-clock reads ... inside handlers"). All business-logic
//! timestamps flow through a [`Clock`], so tests can drive detector windows
//! and tracker/aggregator transitions with exact, reproducible times.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// A clock that provides the current time.
pub trait Clock: Clone + Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

/// Real wall clock.
#[derive(Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fake clock for testing with controllable time.
#[derive(Clone)]
pub struct FakeClock {
    current: Arc<Mutex<DateTime<Utc>>>,
}

impl FakeClock {
    /// Starts the fake clock at a fixed, deterministic epoch so tests never
    /// depend on wall-clock time at run time.
    pub fn new() -> Self {
        Self::at(DateTime::from_timestamp(1_000_000, 0).unwrap_or_else(Utc::now))
    }

    pub fn at(t: DateTime<Utc>) -> Self {
        Self { current: Arc::new(Mutex::new(t)) }
    }

    /// Advance the clock by the given duration.
    pub fn advance(&self, duration: Duration) {
        let delta = chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::zero());
        *self.current.lock() += delta;
    }

    /// Set the clock to a specific instant.
    pub fn set(&self, t: DateTime<Utc>) {
        *self.current.lock() = t;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock()
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
