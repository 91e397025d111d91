// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use kube::core::{ObjectMeta, TypeMeta};
use serde_json::json;

fn dynamic_object(namespace: &str, name: &str, data: Value) -> DynamicObject {
    DynamicObject {
        types: Some(TypeMeta { api_version: "kustomize.toolkit.fluxcd.io/v1".to_string(), kind: "Kustomization".to_string() }),
        metadata: ObjectMeta {
            namespace: Some(namespace.to_string()),
            name: Some(name.to_string()),
            ..Default::default()
        },
        data,
    }
}

#[test]
fn extracts_ready_condition_and_revision() {
    let obj = dynamic_object(
        "flux-system",
        "apps",
        json!({
            "spec": {"suspend": false},
            "status": {
                "lastAppliedRevision": "main@sha1:abc123",
                "conditions": [
                    {"type": "Ready", "status": "True", "reason": "ReconciliationSucceeded", "message": "applied", "lastTransitionTime": "2026-01-01T00:00:00Z"}
                ]
            }
        }),
    );

    let status = extract_status(&obj, "cluster-a", "Kustomization");
    assert!(status.ready);
    assert_eq!(status.reason, "ReconciliationSucceeded");
    assert_eq!(status.revision, "main@sha1:abc123");
    assert!(!status.suspended);
}

#[test]
fn falls_back_to_attempted_revision_when_applied_is_absent() {
    let obj = dynamic_object(
        "flux-system",
        "apps",
        json!({
            "status": {
                "lastAttemptedRevision": "main@sha1:def456",
                "conditions": [{"type": "Ready", "status": "False", "reason": "Failed", "message": "boom"}]
            }
        }),
    );

    let status = extract_status(&obj, "cluster-a", "Kustomization");
    assert!(!status.ready);
    assert_eq!(status.revision, "main@sha1:def456");
    assert_eq!(status.message, "boom");
}

#[test]
fn suspended_resource_with_no_status_is_not_ready() {
    let obj = dynamic_object("flux-system", "apps", json!({"spec": {"suspend": true}}));
    let status = extract_status(&obj, "cluster-a", "Kustomization");
    assert!(status.suspended);
    assert!(!status.ready);
    assert_eq!(status.revision, "");
}
