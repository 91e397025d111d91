// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Signal delivery for durable tasks.
//!
//! A signal is an externally-originated command (e.g. a newly-raised alert
//! arriving at the aggregator) that a durable task's loop must observe and
//! apply in the order it was sent, interleaved with its own polling and
//! sleep timers. This is a thin FIFO wrapper over an unbounded mpsc channel
//! so callers never block sending a signal into a task that's mid-poll.

use tokio::sync::mpsc;

/// The sending half of a task's signal channel. Cheaply cloneable — every
/// caller that needs to signal a task holds its own handle.
#[derive(Clone)]
pub struct SignalSender<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T> SignalSender<T> {
    /// Enqueue a signal. Fails only if the task's loop (and every receiver
    /// clone) has already been dropped.
    pub fn send(&self, signal: T) -> Result<(), T> {
        self.tx.send(signal).map_err(|e| e.0)
    }
}

/// The receiving half, owned by the durable task's loop and selected over
/// alongside its poll timer and cancellation token.
pub struct SignalReceiver<T> {
    rx: mpsc::UnboundedReceiver<T>,
}

impl<T> SignalReceiver<T> {
    /// Receive the next signal in FIFO order, or `None` once every sender
    /// has been dropped.
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Drain every signal currently queued without waiting, preserving
    /// arrival order.
    pub fn drain(&mut self) -> Vec<T> {
        let mut out = Vec::new();
        while let Ok(signal) = self.rx.try_recv() {
            out.push(signal);
        }
        out
    }
}

/// A paired sender/receiver for one durable task's signal inbox.
pub struct SignalChannel;

impl SignalChannel {
    pub fn new<T>() -> (SignalSender<T>, SignalReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (SignalSender { tx }, SignalReceiver { rx })
    }
}

#[cfg(test)]
#[path = "signal_tests.rs"]
mod tests;
