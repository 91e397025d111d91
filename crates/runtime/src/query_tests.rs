// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn get_reflects_the_most_recently_published_state() {
    let q = Queryable::new(0u32);
    assert_eq!(q.get(), 0);
    q.publish(42);
    assert_eq!(q.get(), 42);
}

#[test]
fn clones_share_the_same_underlying_state() {
    let q = Queryable::new(vec![1, 2, 3]);
    let clone = q.clone();
    q.publish(vec![4, 5]);
    assert_eq!(clone.get(), vec![4, 5]);
}

#[test]
fn with_reads_without_cloning() {
    let q = Queryable::new(String::from("hello"));
    let len = q.with(|s| s.len());
    assert_eq!(len, 5);
}
