// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::Utc;

fn entry(count: i64) -> AlertEntry {
    AlertEntry {
        detector: "crash-loop".to_string(),
        cluster: "c1".to_string(),
        namespace: "default".to_string(),
        kind: "Pod".to_string(),
        name: "pod1".to_string(),
        message: "crash looping".to_string(),
        count,
        first_seen: Utc::now(),
        last_seen: Utc::now(),
    }
}

#[test]
fn new_entry_produces_one_unresolved_alert() {
    let before = BTreeMap::new();
    let mut after = BTreeMap::new();
    after.insert("crash-loop:c1/default/pod1".to_string(), entry(3));

    let alerts = diff_alerts(&before, &after, Utc::now());
    assert_eq!(alerts.len(), 1);
    assert!(!alerts[0].resolved);
    assert_eq!(alerts[0].count, 3);
}

#[test]
fn unchanged_entry_produces_no_alert() {
    let e = entry(3);
    let mut before = BTreeMap::new();
    before.insert("k".to_string(), e.clone());
    let mut after = BTreeMap::new();
    after.insert("k".to_string(), e);

    assert!(diff_alerts(&before, &after, Utc::now()).is_empty());
}

#[test]
fn updated_count_produces_one_unresolved_alert() {
    let mut before = BTreeMap::new();
    before.insert("k".to_string(), entry(3));
    let mut after = BTreeMap::new();
    after.insert("k".to_string(), entry(4));

    let alerts = diff_alerts(&before, &after, Utc::now());
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].count, 4);
    assert!(!alerts[0].resolved);
}

#[test]
fn cleared_entry_produces_one_resolved_alert() {
    let mut before = BTreeMap::new();
    before.insert("k".to_string(), entry(3));
    let after = BTreeMap::new();

    let now = Utc::now();
    let alerts = diff_alerts(&before, &after, now);
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].resolved);
    assert_eq!(alerts[0].resolved_at, Some(now));
}
