// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use parking_lot::Mutex;
use sharedseq_core::Task;
use std::fmt;

type Detach = Box<dyn FnOnce() + Send>;

/// Handle to one attached consumer.
///
/// Disposing detaches exactly that consumer, synchronously: when it was the
/// last one on a shared sequence, the source run is dropped before
/// [`dispose`](Self::dispose) returns. A disposed consumer receives nothing
/// more, not even completion.
///
/// Dropping the handle disposes it.
#[must_use = "dropping a Disposable detaches the consumer immediately"]
pub struct Disposable {
    task: Task,
    detach: Mutex<Option<Detach>>,
}

impl Disposable {
    pub(crate) fn new<F>(task: Task, detach: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            task,
            detach: Mutex::new(Some(Box::new(detach))),
        }
    }

    /// Detaches the consumer. Idempotent.
    pub fn dispose(&self) {
        self.task.cancel();
        let detach = self.detach.lock().take();
        if let Some(detach) = detach {
            detach();
            sharedseq_core::debug!("sharedseq: consumer detached");
        }
    }

    /// Returns `true` once disposed.
    pub fn is_disposed(&self) -> bool {
        self.task.is_cancelled()
    }
}

impl Drop for Disposable {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for Disposable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposable")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
