// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `PollFluxResources` — the FluxTracker's sole external activity (spec §6).
//!
//! Lists all five GitOps GVRs via the dynamic client and extracts each
//! object's reconciliation status the way Flux controllers report it: the
//! `Ready` condition, the suspend flag, and the applied/attempted revision.

use async_trait::async_trait;
use kube::api::{Api, ApiResource, DynamicObject, ListParams};
use kube::Client;
use kube::ResourceExt;
use serde_json::Value;
use swarm_core::FluxResourceStatus;
use swarm_runtime::{Activity, RetryPolicy};

use crate::error::AdapterError;

struct GvrSpec {
    kind: &'static str,
    group: &'static str,
    version: &'static str,
    plural: &'static str,
}

/// The five GitOps custom resources the tracker watches (spec §4.4, §6).
const FLUX_GVRS: &[GvrSpec] = &[
    GvrSpec { kind: "Kustomization", group: "kustomize.toolkit.fluxcd.io", version: "v1", plural: "kustomizations" },
    GvrSpec { kind: "HelmRelease", group: "helm.toolkit.fluxcd.io", version: "v2", plural: "helmreleases" },
    GvrSpec { kind: "GitRepository", group: "source.toolkit.fluxcd.io", version: "v1", plural: "gitrepositories" },
    GvrSpec { kind: "HelmRepository", group: "source.toolkit.fluxcd.io", version: "v1", plural: "helmrepositories" },
    GvrSpec { kind: "OCIRepository", group: "source.toolkit.fluxcd.io", version: "v1", plural: "ocirepositories" },
];

/// Lists every GitOps resource visible to `client` for `cluster`.
pub struct PollFluxResourcesActivity {
    pub client: Client,
    pub cluster: String,
}

#[async_trait]
impl Activity for PollFluxResourcesActivity {
    type Output = Vec<FluxResourceStatus>;
    type Error = AdapterError;

    fn name(&self) -> &'static str {
        "poll-flux-resources"
    }

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::flux_poll()
    }

    async fn call(&self) -> Result<Self::Output, Self::Error> {
        let mut statuses = Vec::new();
        for gvr in FLUX_GVRS {
            let ar = ApiResource::from_gvk_with_plural(
                &kube::core::GroupVersionKind::gvk(gvr.group, gvr.version, gvr.kind),
                gvr.plural,
            );
            let api: Api<DynamicObject> = Api::all_with(self.client.clone(), &ar);
            let list = api.list(&ListParams::default()).await?;
            for obj in list.items {
                statuses.push(extract_status(&obj, &self.cluster, gvr.kind));
            }
        }
        Ok(statuses)
    }
}

/// Ports the Go `fluxmon.ExtractStatus` logic: pull `spec.suspend`, the
/// `Ready` status condition and its reason/message/transition time, and the
/// applied (falling back to attempted) revision out of the object's raw
/// JSON.
fn extract_status(obj: &DynamicObject, cluster: &str, kind: &str) -> FluxResourceStatus {
    let mut status = FluxResourceStatus {
        cluster: cluster.to_string(),
        namespace: obj.namespace().unwrap_or_default(),
        name: obj.name_any(),
        kind: kind.to_string(),
        ready: false,
        reason: String::new(),
        message: String::new(),
        revision: String::new(),
        suspended: false,
        deleted: false,
        last_transition: chrono::Utc::now(),
        last_seen: chrono::Utc::now(),
    };

    if let Some(suspend) = obj.data.pointer("/spec/suspend").and_then(Value::as_bool) {
        status.suspended = suspend;
    }

    let Some(st) = obj.data.get("status") else { return status };

    if let Some(rev) = st.get("lastAppliedRevision").and_then(Value::as_str).filter(|s| !s.is_empty()) {
        status.revision = rev.to_string();
    } else if let Some(rev) = st.get("lastAttemptedRevision").and_then(Value::as_str).filter(|s| !s.is_empty()) {
        status.revision = rev.to_string();
    }

    let Some(conditions) = st.get("conditions").and_then(Value::as_array) else { return status };
    for condition in conditions {
        if condition.get("type").and_then(Value::as_str) != Some("Ready") {
            continue;
        }
        status.ready = condition.get("status").and_then(Value::as_str) == Some("True");
        if let Some(reason) = condition.get("reason").and_then(Value::as_str) {
            status.reason = reason.to_string();
        }
        if let Some(message) = condition.get("message").and_then(Value::as_str) {
            status.message = message.to_string();
        }
        if let Some(lt) = condition.get("lastTransitionTime").and_then(Value::as_str) {
            if let Ok(parsed) = chrono::DateTime::parse_from_rfc3339(lt) {
                status.last_transition = parsed.with_timezone(&chrono::Utc);
            }
        }
        break;
    }

    status
}

#[cfg(test)]
#[path = "flux_tests.rs"]
mod tests;
