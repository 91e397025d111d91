// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! GitOps ("flux") reconciliation status (spec §3 "FluxResourceStatus").

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reconciliation state of a single GitOps custom resource, identified by
/// `(kind, namespace, name)`. Mutated in-place by [`TrackerState`] polls.
///
/// [`TrackerState`]: crate::TrackerState
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FluxResourceStatus {
    pub cluster: String,
    pub namespace: String,
    pub name: String,
    pub kind: String,
    pub ready: bool,
    pub reason: String,
    pub message: String,
    pub revision: String,
    pub suspended: bool,
    pub deleted: bool,
    pub last_transition: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

/// `kind/namespace/name` — uniquely identifies a resource across the
/// tracker's lifetime, modulo reuse of the same triple (spec §8 invariant).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceKey(pub String);

impl ResourceKey {
    pub fn of(status: &FluxResourceStatus) -> Self {
        Self(format!("{}/{}/{}", status.kind, status.namespace, status.name))
    }
}

impl std::fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Counts returned by the FluxTracker `summary` query (spec §4.4).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub ready: usize,
    pub failed: usize,
    pub suspended: usize,
    pub unknown: usize,
    pub total: usize,
}

/// The five GitOps custom resource kinds polled by `PollFluxResources`
/// (spec §4.4, §6).
pub const FLUX_RESOURCE_KINDS: &[&str] =
    &["Kustomization", "HelmRelease", "GitRepository", "HelmRepository", "OCIRepository"];
