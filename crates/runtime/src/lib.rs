// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! swarm-runtime: the durable-task substrate shared by every long-running
//! loop in the observer (EventWatcher, FluxTracker, AlertAggregator).
//!
//! Each durable task is a plain async loop, not a replayed workflow engine:
//! it persists mutations to a [`wal::Wal`] as they happen, folds them into a
//! periodic [`snapshot::Snapshot`] at a continue-as-new boundary, and on
//! restart loads the last snapshot plus any WAL entries recorded after it.
//! External calls go through [`activity::Activity`], which applies
//! [`retry::retry_with_backoff`] on top. Incoming commands arrive over a
//! [`signal::SignalChannel`] and queries read a [`query::Queryable`]
//! snapshot of the task's state without touching the loop itself.

pub mod activity;
pub mod error;
pub mod query;
pub mod retry;
pub mod signal;
pub mod snapshot;
pub mod wal;

pub use activity::Activity;
pub use error::RuntimeError;
pub use query::Queryable;
pub use retry::{retry_with_backoff, RetryPolicy};
pub use signal::{SignalChannel, SignalReceiver, SignalSender};
pub use snapshot::{load_snapshot, save_snapshot, Snapshot};
pub use wal::{Wal, WalEntry};
