// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Scheduler-agnostic task spawning with cooperative cancellation.

use crate::Scheduler;
use core::future::Future;
use tokio_util::sync::CancellationToken;

/// Handle to a background task, cancelled when dropped.
///
/// The spawned future receives a `CancellationToken` it should race against
/// its work so it can exit once the handle is cancelled or dropped.
///
/// # Example
///
/// ```rust
/// use sharedseq_core::{Task, TokioScheduler};
///
/// # #[tokio::main]
/// # async fn main() {
/// let task = Task::spawn(&TokioScheduler, |cancel| async move {
///     cancel.cancelled().await;
/// });
///
/// assert!(!task.is_cancelled());
/// drop(task);
/// # }
/// ```
#[derive(Debug)]
pub struct Task {
    cancel: CancellationToken,
}

impl Task {
    /// Spawns the future built by `f` on `scheduler`.
    pub fn spawn<S, F, Fut>(scheduler: &S, f: F) -> Self
    where
        S: Scheduler,
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        scheduler.spawn(f(cancel.clone()));
        Self { cancel }
    }

    /// Signals the task to stop. Does not wait for it.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns `true` once `cancel()` was called or the handle was dropped.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for Task {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
