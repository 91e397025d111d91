// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! swarm-adapters: the platform shims (spec §2 "Platform shims") — the only
//! code in the workspace that makes real `kube` API calls. Everything here
//! is read-only: `list` and `watch`, never a write, matching spec §1's
//! non-goal of writing back to any cluster.

pub mod error;
pub mod events;
pub mod flux;

pub use error::AdapterError;
pub use events::{PollKubeEventsActivity, PollKubeEventsResult};
pub use flux::PollFluxResourcesActivity;
