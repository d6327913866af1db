// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::recorded::Recorded;
use parking_lot::Mutex;
use sharedseq_core::{Observer, SequenceError};
use std::sync::Arc;
use tokio::time::Instant;

/// An [`Observer`] recording every event with the virtual time it arrived at.
///
/// Clones share the recording, so a clone can be handed to the sequence under
/// test while the original is kept for assertions.
pub struct TestObserver<T> {
    origin: Instant,
    events: Arc<Mutex<Vec<(u64, Recorded<T>)>>>,
}

impl<T> TestObserver<T> {
    pub(crate) fn new(origin: Instant) -> Self {
        Self {
            origin,
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn record(&self, event: Recorded<T>) {
        let time = millis_since(self.origin);
        self.events.lock().push((time, event));
    }

    /// Every event recorded so far.
    pub fn events(&self) -> Vec<(u64, Recorded<T>)>
    where
        T: Clone,
    {
        self.events.lock().clone()
    }

    /// The values recorded so far, without their times.
    pub fn values(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.events
            .lock()
            .iter()
            .filter_map(|(_, event)| event.value().cloned())
            .collect()
    }

    /// Returns `true` once a completion was recorded.
    pub fn is_completed(&self) -> bool {
        self.events
            .lock()
            .iter()
            .any(|(_, event)| matches!(event, Recorded::Completed))
    }
}

impl<T> Clone for TestObserver<T> {
    fn clone(&self) -> Self {
        Self {
            origin: self.origin,
            events: Arc::clone(&self.events),
        }
    }
}

impl<T: Send + 'static> Observer<T> for TestObserver<T> {
    fn on_next(&mut self, value: T) {
        self.record(Recorded::Next(value));
    }

    fn on_error(&mut self, error: SequenceError) {
        self.record(Recorded::from_error(&error));
    }

    fn on_completed(&mut self) {
        self.record(Recorded::Completed);
    }
}

pub(crate) fn millis_since(origin: Instant) -> u64 {
    u64::try_from(Instant::now().duration_since(origin).as_millis()).unwrap_or(u64::MAX)
}
