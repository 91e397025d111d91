// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use k8s_openapi::api::core::v1::{EventSource, ObjectReference};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;

fn sample_event() -> KubeEvent {
    KubeEvent {
        involved_object: ObjectReference {
            name: Some("pod1".to_string()),
            kind: Some("Pod".to_string()),
            ..Default::default()
        },
        reason: Some("BackOff".to_string()),
        message: Some("container back-off".to_string()),
        source: Some(EventSource { component: Some("kubelet".to_string()), ..Default::default() }),
        type_: Some("Warning".to_string()),
        count: Some(3),
        first_timestamp: Some(Time(chrono::Utc::now())),
        last_timestamp: Some(Time(chrono::Utc::now())),
        ..Default::default()
    }
}

#[test]
fn converts_warning_severity() {
    let ev = sample_event();
    let converted = to_cluster_event("cluster-a", &ev);
    assert_eq!(converted.cluster, "cluster-a");
    assert_eq!(converted.name, "pod1");
    assert_eq!(converted.kind, "Pod");
    assert_eq!(converted.reason, "BackOff");
    assert_eq!(converted.source, "kubelet");
    assert_eq!(converted.count, 3);
    assert_eq!(converted.severity, Severity::Warning);
}

#[test]
fn missing_type_defaults_to_normal_severity() {
    let mut ev = sample_event();
    ev.type_ = None;
    let converted = to_cluster_event("cluster-a", &ev);
    assert_eq!(converted.severity, Severity::Normal);
}
