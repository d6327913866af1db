// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Sequence algebra re-exposed under the sharing policy.
//!
//! The `try_*` forms take fallible callbacks. An `Err` drops the element it
//! was computed for, is reported to the sequence's fault reporter, and the
//! sequence carries on with the next element.

use super::SharedSequence;
use crate::share::SharingPolicy;
use crate::Observable;
use sharedseq_core::{Element, FaultReporter, IntoSequenceError};

fn report_failure<E: IntoSequenceError>(reporter: &FaultReporter, error: E) {
    reporter.report(error.into_sequence_error());
}

impl<T: Element, P: SharingPolicy> SharedSequence<T, P> {
    /// Transforms every value with `f`.
    pub fn map<U, F>(&self, f: F) -> SharedSequence<U, P>
    where
        U: Element,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        self.derive(self.source.map(f))
    }

    /// Transforms every value with `f`, dropping and reporting failures.
    pub fn try_map<U, E, F>(&self, f: F) -> SharedSequence<U, P>
    where
        U: Element,
        E: IntoSequenceError,
        F: Fn(T) -> Result<U, E> + Send + Sync + 'static,
    {
        let reporter = self.reporter.clone();
        self.derive(self.source.filter_map(move |value| match f(value) {
            Ok(mapped) => Some(mapped),
            Err(e) => {
                report_failure(&reporter, e);
                None
            }
        }))
    }

    /// Keeps the values `predicate` accepts.
    pub fn filter<F>(&self, predicate: F) -> SharedSequence<T, P>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.derive(self.source.filter(predicate))
    }

    /// Keeps the values `predicate` accepts, dropping and reporting failures.
    pub fn try_filter<E, F>(&self, predicate: F) -> SharedSequence<T, P>
    where
        E: IntoSequenceError,
        F: Fn(&T) -> Result<bool, E> + Send + Sync + 'static,
    {
        let reporter = self.reporter.clone();
        self.derive(self.source.filter(move |value| match predicate(value) {
            Ok(keep) => keep,
            Err(e) => {
                report_failure(&reporter, e);
                false
            }
        }))
    }

    /// Emits `seed` and then the accumulation of every value.
    pub fn scan<A, F>(&self, seed: A, f: F) -> SharedSequence<A, P>
    where
        A: Element,
        F: Fn(A, T) -> A + Send + Sync + 'static,
    {
        self.derive(self.source.scan(seed, f))
    }

    /// Merges the sequences `f` returns for every value.
    pub fn flat_map<U, F>(&self, f: F) -> SharedSequence<U, P>
    where
        U: Element,
        F: Fn(T) -> SharedSequence<U, P> + Send + Sync + 'static,
    {
        self.derive(self.source.flat_map(move |value| f(value).source))
    }

    /// Like [`flat_map`](Self::flat_map); a failing `f` contributes nothing
    /// and is reported.
    pub fn try_flat_map<U, E, F>(&self, f: F) -> SharedSequence<U, P>
    where
        U: Element,
        E: IntoSequenceError,
        F: Fn(T) -> Result<SharedSequence<U, P>, E> + Send + Sync + 'static,
    {
        let reporter = self.reporter.clone();
        self.derive(self.source.flat_map(move |value| match f(value) {
            Ok(inner) => inner.source,
            Err(e) => {
                report_failure(&reporter, e);
                Observable::empty()
            }
        }))
    }

    /// Mirrors the sequence `f` returns for the latest value.
    pub fn switch_map<U, F>(&self, f: F) -> SharedSequence<U, P>
    where
        U: Element,
        F: Fn(T) -> SharedSequence<U, P> + Send + Sync + 'static,
    {
        self.derive(self.source.switch_map(move |value| f(value).source))
    }

    /// Like [`switch_map`](Self::switch_map); a failing `f` keeps the current
    /// inner sequence and is reported.
    pub fn try_switch_map<U, E, F>(&self, f: F) -> SharedSequence<U, P>
    where
        U: Element,
        E: IntoSequenceError,
        F: Fn(T) -> Result<SharedSequence<U, P>, E> + Send + Sync + 'static,
    {
        let reporter = self.reporter.clone();
        let source = self
            .source
            .filter_map(move |value| match f(value) {
                Ok(inner) => Some(inner),
                Err(e) => {
                    report_failure(&reporter, e);
                    None
                }
            })
            .switch_map(|inner| inner.source);
        self.derive(source)
    }

    /// Suppresses consecutive duplicates.
    pub fn distinct_until_changed(&self) -> SharedSequence<T, P>
    where
        T: PartialEq,
    {
        self.derive(self.source.distinct_until_changed())
    }

    /// Suppresses consecutive values whose `key` is unchanged.
    pub fn distinct_until_changed_by<K, F>(&self, key: F) -> SharedSequence<T, P>
    where
        K: PartialEq,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        self.derive(self.source.distinct_until_changed_by(key))
    }

    /// Suppresses consecutive values that `eq` considers equal.
    pub fn distinct_until_changed_with<F>(&self, eq: F) -> SharedSequence<T, P>
    where
        F: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        self.derive(self.source.distinct_until_changed_with(eq))
    }

    /// Emits `value` first on every subscription.
    pub fn start_with(&self, value: T) -> SharedSequence<T, P> {
        self.derive(self.source.start_with(value))
    }

    /// Calls `f` with every value, passing it through unchanged.
    pub fn tap<F>(&self, f: F) -> SharedSequence<T, P>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.derive(self.source.tap(f))
    }

    /// Calls `f` with every value; a value whose callback fails is dropped
    /// and the failure reported.
    pub fn try_tap<E, F>(&self, f: F) -> SharedSequence<T, P>
    where
        E: IntoSequenceError,
        F: Fn(&T) -> Result<(), E> + Send + Sync + 'static,
    {
        let reporter = self.reporter.clone();
        self.derive(self.source.filter(move |value| match f(value) {
            Ok(()) => true,
            Err(e) => {
                report_failure(&reporter, e);
                false
            }
        }))
    }
}
