// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Scheduling contexts for delivery and forwarding work.

use core::future::Future;

/// An execution context that sequence work is delivered on.
///
/// A sharing policy names one scheduler; every forwarding task of its shared
/// sequences and every consumer attached through `drive` runs on it.
pub trait Scheduler: Clone + Send + Sync + 'static {
    /// Runs `future` to completion on this context, detached from the caller.
    fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static;
}

/// Schedules onto the tokio runtime the caller is running in.
///
/// Under a current-thread runtime (the `#[tokio::test]` default) every task
/// runs on one thread, which makes this the single delivery context of the
/// driver policy.
///
/// # Panics
///
/// `spawn` panics when called outside a tokio runtime.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(future);
    }
}
