// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! swarm-flux: the per-cluster FluxTracker durable task (spec §4.4).

pub mod error;
pub mod state;
pub mod tracker;

pub use error::FluxError;
pub use state::TrackerState;
pub use tracker::{FluxTracker, MAX_POLL_ITERATIONS, POLL_INTERVAL};
