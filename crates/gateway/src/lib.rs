// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! swarm-gateway: the read-only HTTP surface over every durable task's
//! queryable state (spec §4.7).

pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use error::GatewayError;
pub use routes::router;
pub use server::serve;
pub use state::{AppState, ClusterInfo, WorkflowHandle};
