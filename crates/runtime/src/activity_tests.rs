// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

struct FlakyActivity {
    calls: AtomicU32,
    succeed_after: u32,
}

#[async_trait]
impl Activity for FlakyActivity {
    type Output = u32;
    type Error = &'static str;

    fn name(&self) -> &'static str {
        "flaky-test-activity"
    }

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(Duration::from_millis(1), 2.0, Duration::from_millis(10), 3)
    }

    async fn call(&self) -> Result<Self::Output, Self::Error> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.succeed_after {
            Err("not yet")
        } else {
            Ok(n)
        }
    }
}

#[tokio::test(start_paused = true)]
async fn succeeds_once_underlying_call_succeeds() {
    let activity = FlakyActivity { calls: AtomicU32::new(0), succeed_after: 1 };
    let result = run(&activity).await;
    assert_eq!(result.unwrap(), 1);
}

#[tokio::test(start_paused = true)]
async fn exhausted_retries_surface_as_activity_exhausted() {
    let activity = FlakyActivity { calls: AtomicU32::new(0), succeed_after: 99 };
    let err = run(&activity).await.unwrap_err();
    match err {
        RuntimeError::ActivityExhausted { activity: name, attempts, .. } => {
            assert_eq!(name, "flaky-test-activity");
            assert_eq!(attempts, 3);
        }
        other => panic!("unexpected error variant: {other:?}"),
    }
}
