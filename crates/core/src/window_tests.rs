// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration as StdDuration;

fn t(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap()
}

#[test]
fn count_prunes_entries_older_than_window() {
    let mut w = EventWindow::new(StdDuration::from_secs(600));
    w.add(t(0));
    w.add(t(100));
    w.add(t(700));
    // cutoff = 700 - 600 = 100, so t(0) is dropped, t(100) and t(700) retained
    assert_eq!(w.count(t(700)), 2);
}

#[test]
fn count_on_empty_window_is_zero() {
    let mut w = EventWindow::new(StdDuration::from_secs(60));
    assert_eq!(w.count(t(0)), 0);
}

#[test]
fn last_seen_is_zero_instant_when_empty() {
    let w = EventWindow::new(StdDuration::from_secs(60));
    assert_eq!(w.last_seen(), DateTime::from_timestamp(0, 0).unwrap());
}

#[test]
fn last_seen_is_max_retained_timestamp() {
    let mut w = EventWindow::new(StdDuration::from_secs(600));
    w.add(t(10));
    w.add(t(20));
    assert_eq!(w.last_seen(), t(20));
}

#[test]
fn count_is_monotone_non_increasing_with_no_add() {
    let mut w = EventWindow::new(StdDuration::from_secs(60));
    w.add(t(0));
    w.add(t(30));
    let c1 = w.count(t(30));
    let c2 = w.count(t(61));
    let c3 = w.count(t(91));
    assert!(c2 <= c1);
    assert!(c3 <= c2);
}

#[test]
fn out_of_order_arrival_tightens_window_without_sorting() {
    let mut w = EventWindow::new(StdDuration::from_secs(600));
    w.add(t(700));
    w.add(t(50)); // arrives "late" relative to window ordering assumption
    // prune only drops a contiguous prefix; t(50) is not before it so both remain
    assert_eq!(w.count(t(700)), 2);
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn count_never_increases_without_add(offsets in proptest::collection::vec(0i64..10_000, 0..20), advance in 0i64..20_000) {
            let mut w = EventWindow::new(StdDuration::from_secs(3600));
            let base = t(0);
            for off in &offsets {
                w.add(base + chrono::Duration::seconds(*off));
            }
            let now = base + chrono::Duration::seconds(offsets.iter().copied().max().unwrap_or(0));
            let c1 = w.count(now);
            let c2 = w.count(now + chrono::Duration::seconds(advance));
            prop_assert!(c2 <= c1);
        }
    }
}
