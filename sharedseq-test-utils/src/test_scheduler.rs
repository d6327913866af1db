// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Virtual-time scheduler for scripted scenarios.
//!
//! Built on tokio's paused clock: run the test with
//! `#[tokio::test(start_paused = true)]`. Times are milliseconds since the
//! scheduler was created.
//!
//! Actions scheduled for the same instant run in the order they were
//! scheduled. Between two actions the runtime drains every ready task before
//! the clock moves, so everything an action causes at time `t` is observed
//! at time `t`.
//!
//! ```
//! use sharedseq_test_utils::{complete, next, TestScheduler};
//! use futures::StreamExt;
//!
//! # let runtime = tokio::runtime::Builder::new_current_thread()
//! #     .enable_time()
//! #     .start_paused(true)
//! #     .build()
//! #     .unwrap();
//! # runtime.block_on(async {
//! let mut scheduler = TestScheduler::new();
//! let source = scheduler.create_cold_observable(vec![next(10, 1), complete(20)]);
//!
//! let run = source.observable().subscribe();
//! scheduler.advance_to(30).await;
//!
//! let items: Vec<_> = run.map(|item| item.unwrap()).collect().await;
//! assert_eq!(items, vec![1]);
//! # });
//! ```

use crate::cold_observable::ColdObservable;
use crate::helpers::settle;
use crate::recorded::Recorded;
use crate::test_observer::{millis_since, TestObserver};
use core::time::Duration;
use sharedseq_core::Element;
use std::collections::BTreeMap;
use tokio::time::{sleep_until, Instant};

type Action = Box<dyn FnOnce() + Send>;

/// Runs scheduled actions against tokio's paused clock.
pub struct TestScheduler {
    origin: Instant,
    actions: BTreeMap<(u64, u64), Action>,
    next_seq: u64,
}

impl TestScheduler {
    /// Creates a scheduler whose time zero is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            actions: BTreeMap::new(),
            next_seq: 0,
        }
    }

    /// Virtual milliseconds elapsed since creation.
    pub fn now(&self) -> u64 {
        millis_since(self.origin)
    }

    /// Runs `action` when the clock reaches `time`.
    pub fn schedule_at<F>(&mut self, time: u64, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.actions.insert((time, self.next_seq), Box::new(action));
        self.next_seq += 1;
    }

    /// Moves the clock to `time`, running every action due on the way.
    ///
    /// # Panics
    ///
    /// Panics if `time` is in the past.
    pub async fn advance_to(&mut self, time: u64) {
        assert!(
            time >= self.now(),
            "cannot move the clock back from {} to {}",
            self.now(),
            time
        );

        while let Some(entry) = self.actions.first_entry() {
            let (due, _) = *entry.key();
            if due > time {
                break;
            }
            let action = entry.remove();
            sleep_until(self.instant_at(due)).await;
            action();
        }

        sleep_until(self.instant_at(time)).await;
        settle().await;
    }

    /// Moves the clock forward by `millis`.
    pub async fn advance_by(&mut self, millis: u64) {
        let target = self.now() + millis;
        self.advance_to(target).await;
    }

    /// Runs the actions due now and lets their effects settle.
    pub async fn trigger_actions(&mut self) {
        let now = self.now();
        self.advance_to(now).await;
    }

    /// An observer recording against this scheduler's clock.
    pub fn create_observer<T>(&self) -> TestObserver<T> {
        TestObserver::new(self.origin)
    }

    /// A cold source playing `events` relative to each subscription.
    pub fn create_cold_observable<T: Element>(
        &self,
        events: Vec<(u64, Recorded<T>)>,
    ) -> ColdObservable<T> {
        ColdObservable::new(self.origin, events)
    }

    fn instant_at(&self, time: u64) -> Instant {
        self.origin + Duration::from_millis(time)
    }
}

impl Default for TestScheduler {
    fn default() -> Self {
        Self::new()
    }
}
