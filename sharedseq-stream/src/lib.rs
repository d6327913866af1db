// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Shared sequences: multicast, replaying streams that never fail.
//!
//! # Architecture
//!
//! - **[`Observable`]**: a cold, restartable sequence of [`StreamItem`]s with
//!   the usual operators.
//! - **[`SharingPolicy`]**: a compile-time choice of delivery [`Scheduler`] and
//!   `share` transform. [`DriverPolicy`] shares with [`RefCountReplay`].
//! - **[`SharedSequence`]**: an observable that went through a recovery policy
//!   and a share. [`Driver`] is the driver-policy alias.
//! - **[`AsSharedSequenceExt`]**: the conversion operators that pick the
//!   recovery policy.
//!
//! ## Error Handling
//!
//! A source failure never reaches a shared sequence's consumers: the
//! conversion operator decides between completing, emitting a default or
//! switching to another sequence. Failures of `try_*` operator callbacks drop
//! the element and go to the sequence's [`FaultReporter`].
//!
//! # Example
//!
//! ```
//! use sharedseq_stream::{AsSharedSequenceExt, Observable};
//! use futures::StreamExt;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let driver = Observable::from_iter(1..=4)
//!     .as_driver_complete_on_error()
//!     .filter(|x| x % 2 == 0)
//!     .scan(0, |acc, x| acc + x);
//!
//! let values: Vec<_> = driver
//!     .as_observable()
//!     .subscribe()
//!     .map(|item| item.unwrap())
//!     .collect()
//!     .await;
//! assert_eq!(values, vec![0, 2, 6]);
//! # }
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod observable;
pub mod operators;
pub mod share;
pub mod shared_sequence;

pub use self::observable::{BoxItemStream, Observable};
pub use self::share::{DriverPolicy, RefCountReplay, ReplaySubscription, SharingPolicy};
pub use self::shared_sequence::{AsSharedSequenceExt, Driver, SharedSequence};

pub use sharedseq_core::{
    Element, FaultReporter, IntoSequenceError, Scheduler, SequenceError, StreamItem,
    TokioScheduler,
};
