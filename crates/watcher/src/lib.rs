// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! swarm-watcher: the per-cluster EventWatcher durable task (spec §4.3).

pub mod error;
pub mod state;
pub mod watcher;

pub use error::WatcherError;
pub use state::{WatcherState, MAX_BUFFER_SIZE};
pub use watcher::{EventWatcher, MAX_POLL_ITERATIONS, POLL_INTERVAL};
