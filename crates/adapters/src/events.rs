// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `PollKubeEvents` — the EventWatcher's sole external activity (spec §6).
//!
//! Opens one `kube` watch bounded by an 8-second server-side timeout, folds
//! every `Added`/`Modified` item into a [`ClusterEvent`] and advances the
//! resource-version cursor. The watch terminating (timeout, connection
//! reset, or a closed stream) is the expected steady state, not an error —
//! only a hard API error or a `WatchEvent::Error` payload fails the
//! activity, which the caller's retry policy then handles.

use std::time::Duration;

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use k8s_openapi::api::core::v1::Event as KubeEvent;
use kube::api::{Api, WatchEvent, WatchParams};
use kube::Client;
use kube::ResourceExt;
use swarm_core::event::Severity;
use swarm_core::ClusterEvent;
use swarm_runtime::{Activity, RetryPolicy};

use crate::error::AdapterError;

/// One execution's result: the events observed and the resource-version
/// cursor to resume from on the next poll.
#[derive(Debug, Clone)]
pub struct PollKubeEventsResult {
    pub events: Vec<ClusterEvent>,
    pub resource_version: Option<String>,
}

/// Watches the cluster event API for `cluster`, resuming from
/// `resource_version` (spec §4.3, §6).
pub struct PollKubeEventsActivity {
    pub client: Client,
    pub cluster: String,
    pub resource_version: Option<String>,
}

#[async_trait]
impl Activity for PollKubeEventsActivity {
    type Output = PollKubeEventsResult;
    type Error = AdapterError;

    fn name(&self) -> &'static str {
        "poll-kube-events"
    }

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::event_poll()
    }

    async fn call(&self) -> Result<Self::Output, Self::Error> {
        let api: Api<KubeEvent> = Api::all(self.client.clone());
        let wp = WatchParams::default().timeout(8);
        let start_rv = self.resource_version.as_deref().unwrap_or("0");
        let mut stream = api.watch(&wp, start_rv).await?.boxed();

        let mut events = Vec::new();
        let mut resource_version = self.resource_version.clone();

        let watch_body = async {
            while let Some(item) = stream.try_next().await? {
                match item {
                    WatchEvent::Added(ev) | WatchEvent::Modified(ev) => {
                        resource_version = ev.resource_version().or(resource_version);
                        events.push(to_cluster_event(&self.cluster, &ev));
                    }
                    WatchEvent::Bookmark(bk) => {
                        resource_version = Some(bk.metadata.resource_version);
                    }
                    WatchEvent::Deleted(_) => {}
                    WatchEvent::Error(err) => return Err(AdapterError::Kube(kube::Error::Api(err))),
                }
            }
            Ok::<(), AdapterError>(())
        };

        // The server-side timeout closing the stream is normal completion,
        // not a failure — only propagate an error surfaced before that.
        match tokio::time::timeout(Duration::from_secs(9), watch_body).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => return Err(err),
            Err(_elapsed) => {}
        }

        Ok(PollKubeEventsResult { events, resource_version })
    }
}

fn to_cluster_event(cluster: &str, ev: &KubeEvent) -> ClusterEvent {
    let involved = &ev.involved_object;
    let first_seen = ev
        .first_timestamp
        .as_ref()
        .map(|t| t.0)
        .unwrap_or_else(chrono::Utc::now);
    let last_seen = ev
        .last_timestamp
        .as_ref()
        .map(|t| t.0)
        .unwrap_or(first_seen);
    let severity = match ev.type_.as_deref() {
        Some("Warning") => Severity::Warning,
        _ => Severity::Normal,
    };

    ClusterEvent {
        cluster: cluster.to_string(),
        namespace: ev.namespace().unwrap_or_default(),
        name: involved.name.clone().unwrap_or_default(),
        kind: involved.kind.clone().unwrap_or_default(),
        reason: ev.reason.clone().unwrap_or_default(),
        message: ev.message.clone().unwrap_or_default(),
        source: ev.source.as_ref().and_then(|s| s.component.clone()).unwrap_or_default(),
        first_seen,
        last_seen,
        count: ev.count.unwrap_or(1),
        severity,
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
