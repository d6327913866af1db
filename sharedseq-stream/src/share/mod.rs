// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Sharing policies: how a sequence becomes hot and where it is delivered.
//!
//! A [`SharingPolicy`] is a type selected at compile time. It names a
//! [`Scheduler`] for delivery and a `share` transform turning a cold
//! [`Observable`] into its multicast form.
//!
//! [`DriverPolicy`] is the policy behind [`Driver`](crate::Driver): delivery
//! on the tokio runtime and a [`RefCountReplay`] share.
//!
//! ## Characteristics of the driver share
//!
//! - **Single source subscription** however many consumers are attached.
//! - **Replay of one**: a late consumer first receives the latest value.
//! - **Ref-counted**: the source is subscribed by the first consumer and
//!   dropped the moment the last one detaches. The next consumer restarts it.
//!
//! ## Example
//!
//! ```
//! use sharedseq_stream::{DriverPolicy, Observable, SharingPolicy};
//! use futures::StreamExt;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let shared = DriverPolicy::share(Observable::from_iter(vec![1, 2]));
//!
//! let values: Vec<_> = shared.subscribe().map(|item| item.unwrap()).collect().await;
//! assert_eq!(values, vec![1, 2]);
//! # }
//! ```

mod ref_count;

pub use ref_count::{RefCountReplay, ReplaySubscription};

use crate::Observable;
use sharedseq_core::{Element, Scheduler, TokioScheduler};

/// Compile-time choice of delivery context and sharing strategy.
pub trait SharingPolicy: Send + Sync + 'static {
    /// Context that forwarding and consumer delivery run on.
    type Scheduler: Scheduler;

    /// Returns the delivery context.
    fn scheduler() -> Self::Scheduler;

    /// Returns the multicast form of `source`.
    fn share<T: Element>(source: Observable<T>) -> Observable<T>;
}

/// Delivery on the tokio runtime, replay of the latest value, ref-counted.
#[derive(Debug, Clone, Copy, Default)]
pub struct DriverPolicy;

impl SharingPolicy for DriverPolicy {
    type Scheduler = TokioScheduler;

    fn scheduler() -> Self::Scheduler {
        TokioScheduler
    }

    fn share<T: Element>(source: Observable<T>) -> Observable<T> {
        RefCountReplay::new(source, Self::scheduler()).into_observable()
    }
}
