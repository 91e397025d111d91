// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::Utc;
use swarm_core::{FakeClock, SourceClass};
use swarm_runtime::SignalChannel;

fn alert(id: &str, count: i64, resolved: bool) -> Alert {
    Alert {
        id: id.to_string(),
        source: SourceClass::ClusterHealth,
        detector: "crash-loop".to_string(),
        severity: "warning".to_string(),
        cluster: "c1".to_string(),
        namespace: "default".to_string(),
        kind: "Pod".to_string(),
        name: "web-0".to_string(),
        message: "crash looping".to_string(),
        count,
        first_seen: Utc::now(),
        last_seen: Utc::now(),
        resolved,
        resolved_at: None,
    }
}

#[tokio::test]
async fn signaled_alert_becomes_queryable_active_alert() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (tx, rx) = SignalChannel::new::<Alert>();
    let aggregator =
        AlertAggregator::bootstrap(dir.path(), FakeClock::new(), rx).expect("bootstrap");
    let queries = aggregator.queries();
    let cancel = CancellationToken::new();

    let handle = tokio::spawn(aggregator.run(cancel.clone()));

    tx.send(alert("x", 1, false)).expect("send");
    tx.send(alert("x", 2, false)).expect("send");

    // Give the loop a chance to drain the channel.
    for _ in 0..50 {
        if queries.with(|s| s.active.len()) == 1 && queries.with(|s| s.active["x"].count) == 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(queries.with(|s| s.active.len()), 1);
    assert_eq!(queries.with(|s| s.active["x"].count), 2);

    cancel.cancel();
    let _ = handle.await;
}

#[tokio::test(start_paused = true)]
async fn continue_interval_ages_resolved_alerts_into_history() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (tx, rx) = SignalChannel::new::<Alert>();
    let aggregator =
        AlertAggregator::bootstrap(dir.path(), FakeClock::new(), rx).expect("bootstrap");
    let queries = aggregator.queries();
    let cancel = CancellationToken::new();

    let handle = tokio::spawn(aggregator.run(cancel.clone()));

    tx.send(alert("y", 1, true)).expect("send");
    tokio::time::sleep(Duration::from_millis(10)).await;

    tokio::time::advance(CONTINUE_INTERVAL + Duration::from_secs(1)).await;
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert_eq!(queries.with(|s| s.history.len()), 1);
    assert_eq!(queries.with(|s| s.active.len()), 0);

    cancel.cancel();
    let _ = handle.await;
}

#[tokio::test(start_paused = true)]
async fn continue_interval_fires_despite_steady_alert_traffic() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (tx, rx) = SignalChannel::new::<Alert>();
    let aggregator =
        AlertAggregator::bootstrap(dir.path(), FakeClock::new(), rx).expect("bootstrap");
    let queries = aggregator.queries();
    let cancel = CancellationToken::new();

    let handle = tokio::spawn(aggregator.run(cancel.clone()));

    tx.send(alert("z", 1, true)).expect("send");
    tokio::time::sleep(Duration::from_millis(10)).await;

    // Churn alerts continuously across an interval well past
    // CONTINUE_INTERVAL. If the continue-as-new deadline were rebuilt on
    // every `select!` re-entry (the starvation bug this guards against),
    // steady traffic like this would push the deadline out forever and
    // `history` would never grow.
    for i in 0..20u32 {
        tx.send(alert("churn", i as i64, false)).expect("send");
        tokio::time::advance(Duration::from_secs(100)).await;
    }
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert_eq!(queries.with(|s| s.history.len()), 1);
    assert!(!queries.with(|s| s.active.contains_key("z")));

    cancel.cancel();
    let _ = handle.await;
}
