// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Synchronous, side-effect-free reads of a durable task's current state.
//!
//! Queries (spec §5: `recent-events`, `health-alerts`, `resources`,
//! `summary`, `active-alerts`, `alert-history`) never touch the WAL or
//! trigger an activity — they read whatever the loop has last published to
//! a shared [`Queryable`] handle. The gateway holds a clone of each task's
//! handle and answers HTTP requests directly from it, without routing
//! through the task's own event loop.

use std::sync::Arc;

use parking_lot::RwLock;

/// A cheaply-cloneable, thread-safe view of a durable task's state, updated
/// by the task's loop after every mutation and read concurrently by any
/// number of queriers.
pub struct Queryable<S> {
    inner: Arc<RwLock<S>>,
}

impl<S> Clone for Queryable<S> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<S> Queryable<S> {
    pub fn new(initial: S) -> Self {
        Self { inner: Arc::new(RwLock::new(initial)) }
    }

    /// Replace the published state, called by the task loop after it
    /// applies a mutation.
    pub fn publish(&self, state: S) {
        *self.inner.write() = state;
    }

    /// Run `f` against the current state without cloning it out.
    pub fn with<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.inner.read())
    }
}

impl<S: Clone> Queryable<S> {
    /// Snapshot the current state by cloning it out from under the lock.
    pub fn get(&self) -> S {
        self.inner.read().clone()
    }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
