// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities for shared sequences.
//!
//! Designed for development and testing only.
//!
//! # Key Types
//!
//! - [`TestScheduler`]: virtual-time driver on top of tokio's paused clock.
//! - [`TestObserver`]: an observer recording `(time, event)` pairs.
//! - [`ColdObservable`]: a scripted source that logs its subscriptions.
//! - [`Recorded`] with the [`next`], [`error`] and [`complete`] constructors.
//!
//! # Helpers
//!
//! [`settle`], [`unwrap_stream`], [`assert_no_element_emitted`] and
//! [`assert_stream_ended`] for direct stream assertions.

pub mod cold_observable;
pub mod helpers;
pub mod recorded;
pub mod test_observer;
pub mod test_scheduler;

pub use cold_observable::{ColdObservable, SubscriptionRecord};
pub use helpers::{assert_no_element_emitted, assert_stream_ended, settle, unwrap_stream};
pub use recorded::{complete, error, next, Recorded};
pub use test_observer::TestObserver;
pub use test_scheduler::TestScheduler;
