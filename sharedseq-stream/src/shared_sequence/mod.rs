// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Policy-wrapped sequences that never fail.
//!
//! A [`SharedSequence`] owns an observable that has already been shared under
//! its policy `P`, plus the [`FaultReporter`] its fallible operators and
//! consumers report to. It can only be built through a conversion operator
//! (see [`AsSharedSequenceExt`]) or one of the constructors here, so every
//! instance carries a recovery policy and a share.
//!
//! Every operator returns a new `SharedSequence` with the same policy and
//! the same reporter.
//!
//! ## Example
//!
//! ```
//! use sharedseq_stream::{AsSharedSequenceExt, Observable, SequenceError};
//! use futures::StreamExt;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let failing = Observable::from_iter(vec![1, 2])
//!     .flat_map(|x| if x < 2 { Observable::just(x) } else { Observable::error(SequenceError::stream_error("x")) });
//!
//! let driver = failing.as_driver_or(-1).map(|x| x * 10);
//!
//! let values: Vec<_> = driver
//!     .as_observable()
//!     .subscribe()
//!     .map(|item| item.unwrap())
//!     .collect()
//!     .await;
//! assert_eq!(values, vec![10, -10]);
//! # }
//! ```

mod conversion;
mod operators;

pub use conversion::AsSharedSequenceExt;

use crate::share::{DriverPolicy, SharingPolicy};
use crate::Observable;
use core::fmt;
use core::marker::PhantomData;
use sharedseq_core::{Element, FaultReporter, IntoSequenceError};

/// A shared sequence under the driver policy.
pub type Driver<T> = SharedSequence<T, DriverPolicy>;

/// A multicast sequence that recovers from failures according to its origin.
///
/// See the [module documentation](self) for details.
pub struct SharedSequence<T, P = DriverPolicy> {
    source: Observable<T>,
    reporter: FaultReporter,
    _policy: PhantomData<fn() -> P>,
}

impl<T, P> Clone for SharedSequence<T, P> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            reporter: self.reporter.clone(),
            _policy: PhantomData,
        }
    }
}

impl<T, P> fmt::Debug for SharedSequence<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedSequence")
            .field("policy", &core::any::type_name::<P>())
            .field("reporter", &self.reporter)
            .finish_non_exhaustive()
    }
}

impl<T: Element, P: SharingPolicy> SharedSequence<T, P> {
    /// Shares `source` under `P`. The caller guarantees `source` never fails.
    pub(crate) fn from_recovered(source: Observable<T>, reporter: FaultReporter) -> Self {
        Self {
            source: P::share(source),
            reporter,
            _policy: PhantomData,
        }
    }

    /// Derives a sequence from this one's share, keeping policy and reporter.
    pub(crate) fn derive<U: Element>(&self, source: Observable<U>) -> SharedSequence<U, P> {
        SharedSequence::from_recovered(source, self.reporter.clone())
    }

    /// Emits `value` and completes.
    pub fn just(value: T) -> Self {
        Self::from_recovered(Observable::just(value), FaultReporter::global())
    }

    /// Completes immediately.
    pub fn empty() -> Self {
        Self::from_recovered(Observable::empty(), FaultReporter::global())
    }

    /// Never emits and never completes.
    pub fn never() -> Self {
        Self::from_recovered(Observable::never(), FaultReporter::global())
    }

    /// Emits every item of `items` and completes.
    #[allow(clippy::should_implement_trait)]
    pub fn from_iter<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T> + Clone + Send + Sync + 'static,
        I::IntoIter: Send + 'static,
    {
        Self::from_recovered(Observable::from_iter(items), FaultReporter::global())
    }

    /// Calls `factory` on every subscription and mirrors the sequence it returns.
    ///
    /// If `factory` fails, that subscription completes without values. The
    /// failure is not reported.
    pub fn defer<F, E>(factory: F) -> Self
    where
        F: Fn() -> Result<SharedSequence<T, P>, E> + Send + Sync + 'static,
        E: IntoSequenceError,
    {
        let deferred = Observable::defer(move || factory().map(|sequence| sequence.source))
            .catch_error(|_| Observable::empty());
        Self::from_recovered(deferred, FaultReporter::global())
    }

    /// Interleaves the values of every sequence in `sources`.
    ///
    /// Completes once all of them completed. The result reports to the
    /// reporter of the first source, or the global one if there is none.
    pub fn merge<I>(sources: I) -> Self
    where
        I: IntoIterator<Item = SharedSequence<T, P>>,
    {
        let sources: Vec<SharedSequence<T, P>> = sources.into_iter().collect();
        let reporter = sources
            .first()
            .map_or_else(FaultReporter::global, |first| first.reporter.clone());
        let merged = Observable::merge(sources.into_iter().map(|sequence| sequence.source));
        Self::from_recovered(merged, reporter)
    }

    /// Returns the same sequence reporting to `reporter`.
    ///
    /// Every sequence derived from the result reports there as well.
    #[must_use]
    pub fn with_reporter(self, reporter: FaultReporter) -> Self {
        Self { reporter, ..self }
    }

    /// The fault channel this sequence reports to.
    pub fn reporter(&self) -> &FaultReporter {
        &self.reporter
    }

    /// The delivery context of the policy.
    pub fn scheduler(&self) -> P::Scheduler {
        P::scheduler()
    }

    /// The shared observable behind this sequence.
    ///
    /// Subscriptions to it attach to the share like any consumer would.
    pub fn as_observable(&self) -> Observable<T> {
        self.source.clone()
    }
}
