// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exponential-backoff retry policy for activity invocations (spec §5).

use std::future::Future;
use std::time::Duration;

/// Mirrors the frozen retry contract in spec §5: initial 2–5s, coefficient
/// 2.0, max 30–60s, at most 3 attempts.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub initial: Duration,
    pub coefficient: f64,
    pub max_interval: Duration,
    pub max_attempts: u32,
}

impl RetryPolicy {
    pub const fn new(initial: Duration, coefficient: f64, max_interval: Duration, max_attempts: u32) -> Self {
        Self { initial, coefficient, max_interval, max_attempts }
    }

    /// The retry policy for `PollKubeEvents` (spec §5: 30s start-to-close,
    /// initial 2s backoff, max 30s).
    pub const fn event_poll() -> Self {
        Self::new(Duration::from_secs(2), 2.0, Duration::from_secs(30), 3)
    }

    /// The retry policy for `PollFluxResources` (spec §5: 60s start-to-close,
    /// initial 5s backoff, max 60s).
    pub const fn flux_poll() -> Self {
        Self::new(Duration::from_secs(5), 2.0, Duration::from_secs(60), 3)
    }

    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = self.coefficient.powi(attempt as i32);
        let scaled = self.initial.as_secs_f64() * factor;
        Duration::from_secs_f64(scaled).min(self.max_interval)
    }
}

/// Run `op` up to `policy.max_attempts` times, sleeping with exponential
/// backoff between attempts. Returns the last error if every attempt fails.
pub async fn retry_with_backoff<T, E, F, Fut>(policy: RetryPolicy, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                attempt += 1;
                if attempt >= policy.max_attempts {
                    return Err(err);
                }
                tokio::time::sleep(policy.delay_for_attempt(attempt - 1)).await;
            }
        }
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
