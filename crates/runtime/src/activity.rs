// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Activity` abstraction: a fallible, retryable external call (a Kube
//! API poll, a Flux resource listing) invoked by a durable task loop.
//!
//! An activity never runs bare — a durable task always drives it through
//! [`run`], which applies the activity's own [`RetryPolicy`](crate::retry::RetryPolicy)
//! and turns exhausted retries into a [`RuntimeError::ActivityExhausted`]
//! carrying enough context to log and alert on.

use async_trait::async_trait;
use std::fmt::Display;

use crate::error::RuntimeError;
use crate::retry::{retry_with_backoff, RetryPolicy};

/// One externally-effectful operation a durable task depends on.
#[async_trait]
pub trait Activity: Send + Sync {
    type Output: Send;
    type Error: Display + Send;

    /// A stable name used in tracing spans and `RuntimeError::ActivityExhausted`.
    fn name(&self) -> &'static str;

    /// The retry policy this activity should run under.
    fn retry_policy(&self) -> RetryPolicy;

    /// Perform one attempt. Implementations should not retry internally —
    /// retries are the caller's concern via [`run`].
    async fn call(&self) -> Result<Self::Output, Self::Error>;
}

/// Invoke `activity` with its own retry policy, collapsing exhausted
/// retries into a single [`RuntimeError::ActivityExhausted`].
pub async fn run<A: Activity>(activity: &A) -> Result<A::Output, RuntimeError> {
    let name = activity.name();
    let policy = activity.retry_policy();
    let attempts = policy.max_attempts;
    let span = tracing::info_span!("activity", name);
    let _enter = span.enter();

    retry_with_backoff(policy, || activity.call())
        .await
        .map_err(|source| RuntimeError::ActivityExhausted {
            activity: name,
            attempts,
            source: source.to_string(),
        })
}

#[cfg(test)]
#[path = "activity_tests.rs"]
mod tests;
