// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Conversion operators: from an arbitrary observable to a shared sequence.

use super::{Driver, SharedSequence};
use crate::share::{DriverPolicy, SharingPolicy};
use crate::Observable;
use sharedseq_core::{Element, FaultReporter, SequenceError};

/// Turns an [`Observable`] into a [`SharedSequence`] by choosing what happens
/// when the observable fails.
///
/// The `as_driver_*` methods are the `as_shared_*` ones with
/// [`DriverPolicy`]. The result reports to [`FaultReporter::global`]; use
/// [`SharedSequence::with_reporter`] to change that.
///
/// ```
/// use sharedseq_stream::{AsSharedSequenceExt, Observable, SequenceError};
///
/// let source: Observable<i32> = Observable::error(SequenceError::stream_error("offline"));
///
/// let _quiet = source.clone().as_driver_complete_on_error();
/// let _with_default = source.clone().as_driver_or(0);
/// let _with_retry = source.as_driver_recover(|_error| Observable::just(1).as_driver_complete_on_error());
/// ```
pub trait AsSharedSequenceExt<T: Element>: Sized {
    /// Completes on failure. The failure is dropped without a report.
    fn as_shared_complete_on_error<P: SharingPolicy>(self) -> SharedSequence<T, P>;

    /// Emits `default` and completes on failure.
    fn as_shared_or<P: SharingPolicy>(self, default: T) -> SharedSequence<T, P>;

    /// Continues with `fallback` on failure.
    fn as_shared_or_else<P: SharingPolicy>(
        self,
        fallback: SharedSequence<T, P>,
    ) -> SharedSequence<T, P>;

    /// Continues with the sequence `recover` returns for the failure.
    fn as_shared_recover<P, F>(self, recover: F) -> SharedSequence<T, P>
    where
        P: SharingPolicy,
        F: Fn(SequenceError) -> SharedSequence<T, P> + Send + Sync + 'static;

    /// [`as_shared_complete_on_error`](Self::as_shared_complete_on_error) under the driver policy.
    fn as_driver_complete_on_error(self) -> Driver<T> {
        self.as_shared_complete_on_error::<DriverPolicy>()
    }

    /// [`as_shared_or`](Self::as_shared_or) under the driver policy.
    fn as_driver_or(self, default: T) -> Driver<T> {
        self.as_shared_or::<DriverPolicy>(default)
    }

    /// [`as_shared_or_else`](Self::as_shared_or_else) under the driver policy.
    fn as_driver_or_else(self, fallback: Driver<T>) -> Driver<T> {
        self.as_shared_or_else(fallback)
    }

    /// [`as_shared_recover`](Self::as_shared_recover) under the driver policy.
    fn as_driver_recover<F>(self, recover: F) -> Driver<T>
    where
        F: Fn(SequenceError) -> Driver<T> + Send + Sync + 'static,
    {
        self.as_shared_recover(recover)
    }
}

impl<T: Element> AsSharedSequenceExt<T> for Observable<T> {
    fn as_shared_complete_on_error<P: SharingPolicy>(self) -> SharedSequence<T, P> {
        let recovered = self.catch_error(|error| {
            sharedseq_core::debug!("sharedseq: completing after failure: {}", error);
            Observable::empty()
        });
        SharedSequence::from_recovered(recovered, FaultReporter::global())
    }

    fn as_shared_or<P: SharingPolicy>(self, default: T) -> SharedSequence<T, P> {
        let recovered = self.catch_error(move |_| Observable::just(default.clone()));
        SharedSequence::from_recovered(recovered, FaultReporter::global())
    }

    fn as_shared_or_else<P: SharingPolicy>(
        self,
        fallback: SharedSequence<T, P>,
    ) -> SharedSequence<T, P> {
        let fallback = fallback.source;
        let recovered = self.catch_error(move |_| fallback.clone());
        SharedSequence::from_recovered(recovered, FaultReporter::global())
    }

    fn as_shared_recover<P, F>(self, recover: F) -> SharedSequence<T, P>
    where
        P: SharingPolicy,
        F: Fn(SequenceError) -> SharedSequence<T, P> + Send + Sync + 'static,
    {
        let recovered = self.catch_error(move |error| recover(error).source);
        SharedSequence::from_recovered(recovered, FaultReporter::global())
    }
}
