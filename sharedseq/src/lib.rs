// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Shared sequences for UI-style data flows.
//!
//! A [`Driver`] is a sequence that
//!
//! - never fails: it is built from an [`Observable`] by a conversion operator
//!   that decides what a failure turns into,
//! - is shared: however many consumers drive it, the source runs once, and a
//!   late consumer starts from the latest value,
//! - isolates its consumers: a failing `drive` callback is reported to the
//!   [`FaultReporter`] and the subscription stays alive.
//!
//! # Example
//!
//! ```
//! use sharedseq::prelude::*;
//! use std::sync::{Arc, Mutex};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let temperatures = Observable::from_iter(vec![18, 19, 19, 21])
//!     .as_driver_complete_on_error()
//!     .distinct_until_changed()
//!     .map(|celsius| format!("{celsius}°C"));
//!
//! let labels = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&labels);
//! let _subscription = temperatures.drive(move |label| {
//!     sink.lock().unwrap().push(label);
//!     Ok::<(), SequenceError>(())
//! });
//!
//! tokio::time::sleep(std::time::Duration::from_millis(10)).await;
//! assert_eq!(*labels.lock().unwrap(), vec!["18°C", "19°C", "21°C"]);
//! # }
//! ```

pub use sharedseq_core::{
    observer_fn, CallbackObserver, Element, FatalError, FaultReporter, IntoSequenceError,
    Observer, Result, Scheduler, SequenceError, StreamItem, Subject, SubjectError,
    TokioScheduler,
};
pub use sharedseq_exec::{Disposable, DriveExt};
pub use sharedseq_stream::{
    AsSharedSequenceExt, BoxItemStream, Driver, DriverPolicy, Observable, RefCountReplay,
    SharedSequence, SharingPolicy,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use sharedseq_core::{FaultReporter, Observer, SequenceError, StreamItem};
    pub use sharedseq_exec::{Disposable, DriveExt};
    pub use sharedseq_stream::{
        AsSharedSequenceExt, Driver, DriverPolicy, Observable, SharedSequence, SharingPolicy,
    };
}
