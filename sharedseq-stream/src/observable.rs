// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Cold, restartable sequences.
//!
//! An [`Observable`] is a recipe for a run: every call to
//! [`subscribe`](Observable::subscribe) starts a fresh, independent run and
//! returns it as a stream of [`StreamItem`]s. A run ends when the stream ends
//! (completion) or right after its single `Error` item (failure).
//!
//! Dropping the returned stream detaches from the run.
//!
//! ## Example
//!
//! ```
//! use sharedseq_stream::Observable;
//! use futures::StreamExt;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let doubled = Observable::from_iter(vec![1, 2, 3]).map(|x| x * 2);
//!
//! let first: Vec<_> = doubled.subscribe().map(|item| item.unwrap()).collect().await;
//! let second: Vec<_> = doubled.subscribe().map(|item| item.unwrap()).collect().await;
//!
//! assert_eq!(first, vec![2, 4, 6]);
//! assert_eq!(first, second);
//! # }
//! ```

use crate::operators::catch_error::CatchError;
use crate::operators::distinct_until_changed::distinct_until_changed_with;
use crate::operators::flat_map::FlatMap;
use crate::operators::scan::scan_from_seed;
use crate::operators::switch_map::SwitchMap;
use crate::operators::UntilError;
use core::fmt;
use core::pin::Pin;
use futures::future::ready;
use futures::stream::{self, Stream, StreamExt};
use sharedseq_core::{Element, IntoSequenceError, SequenceError, StreamItem};
use std::sync::Arc;

/// A boxed run of a sequence.
pub type BoxItemStream<T> = Pin<Box<dyn Stream<Item = StreamItem<T>> + Send + 'static>>;

type Factory<T> = dyn Fn() -> BoxItemStream<T> + Send + Sync;

/// A cold sequence: each subscription starts its own run.
///
/// See the [module documentation](self) for details.
pub struct Observable<T> {
    factory: Arc<Factory<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            factory: Arc::clone(&self.factory),
        }
    }
}

impl<T> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable").finish_non_exhaustive()
    }
}

impl<T: Element> Observable<T> {
    /// Creates a sequence whose runs are the streams built by `factory`.
    pub fn new<F, S>(factory: F) -> Self
    where
        F: Fn() -> S + Send + Sync + 'static,
        S: Stream<Item = StreamItem<T>> + Send + 'static,
    {
        Self {
            factory: Arc::new(move || Box::pin(factory()) as BoxItemStream<T>),
        }
    }

    /// Starts a new run.
    ///
    /// The run ends right after its first failure, whatever the underlying
    /// stream would produce afterwards.
    pub fn subscribe(&self) -> BoxItemStream<T> {
        Box::pin(UntilError::new((self.factory)()))
    }

    /// Emits `value` and completes.
    pub fn just(value: T) -> Self {
        Self::new(move || stream::once(ready(StreamItem::Value(value.clone()))))
    }

    /// Emits every item of `items` and completes.
    #[allow(clippy::should_implement_trait)]
    pub fn from_iter<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T> + Clone + Send + Sync + 'static,
        I::IntoIter: Send + 'static,
    {
        Self::new(move || stream::iter(items.clone()).map(StreamItem::Value))
    }

    /// Completes immediately.
    pub fn empty() -> Self {
        Self::new(stream::empty::<StreamItem<T>>)
    }

    /// Never emits and never terminates.
    pub fn never() -> Self {
        Self::new(stream::pending::<StreamItem<T>>)
    }

    /// Fails immediately with `error`.
    pub fn error(error: SequenceError) -> Self {
        Self::new(move || stream::once(ready(StreamItem::Error(error.clone()))))
    }

    /// Calls `factory` on every subscription and runs the sequence it returns.
    ///
    /// A factory error becomes the failure of that run.
    pub fn defer<F, E>(factory: F) -> Self
    where
        F: Fn() -> Result<Observable<T>, E> + Send + Sync + 'static,
        E: IntoSequenceError,
    {
        Self::new(move || match factory() {
            Ok(observable) => observable.subscribe(),
            Err(e) => {
                let error = e.into_sequence_error();
                sharedseq_core::debug!("sharedseq: deferred factory failed: {}", error);
                Box::pin(stream::once(ready(StreamItem::Error(error)))) as BoxItemStream<T>
            }
        })
    }

    /// Runs every source concurrently and emits their values as they arrive.
    ///
    /// Completes when every source completed; the first failure ends the run.
    pub fn merge<I>(sources: I) -> Self
    where
        I: IntoIterator<Item = Observable<T>>,
    {
        let sources: Vec<Observable<T>> = sources.into_iter().collect();
        Observable::from_iter(sources).flat_map(|source| source)
    }

    /// Transforms every value with `f`.
    pub fn map<U, F>(&self, f: F) -> Observable<U>
    where
        U: Element,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let source = self.clone();
        let f = Arc::new(f);
        Observable::new(move || {
            let f = Arc::clone(&f);
            source.subscribe().map(move |item| item.map(|value| f(value)))
        })
    }

    /// Keeps the values `predicate` accepts.
    pub fn filter<F>(&self, predicate: F) -> Observable<T>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.filter_map(move |value| predicate(&value).then_some(value))
    }

    /// Transforms every value with `f` and drops those mapped to `None`.
    pub fn filter_map<U, F>(&self, f: F) -> Observable<U>
    where
        U: Element,
        F: Fn(T) -> Option<U> + Send + Sync + 'static,
    {
        let source = self.clone();
        let f = Arc::new(f);
        Observable::new(move || {
            let f = Arc::clone(&f);
            source.subscribe().filter_map(move |item| {
                ready(match item {
                    StreamItem::Value(value) => f(value).map(StreamItem::Value),
                    StreamItem::Error(e) => Some(StreamItem::Error(e)),
                })
            })
        })
    }

    /// Emits `seed` and then the accumulation of every value.
    pub fn scan<A, F>(&self, seed: A, f: F) -> Observable<A>
    where
        A: Element,
        F: Fn(A, T) -> A + Send + Sync + 'static,
    {
        let source = self.clone();
        let f = Arc::new(f);
        Observable::new(move || {
            let f = Arc::clone(&f);
            scan_from_seed(source.subscribe(), seed.clone(), move |acc, value| f(acc, value))
        })
    }

    /// Merges the sequences `f` produces for every value.
    pub fn flat_map<U, F>(&self, f: F) -> Observable<U>
    where
        U: Element,
        F: Fn(T) -> Observable<U> + Send + Sync + 'static,
    {
        let source = self.clone();
        let f = Arc::new(f);
        Observable::new(move || FlatMap::new(source.subscribe(), Arc::clone(&f)))
    }

    /// Mirrors the sequence `f` produces for the latest value.
    pub fn switch_map<U, F>(&self, f: F) -> Observable<U>
    where
        U: Element,
        F: Fn(T) -> Observable<U> + Send + Sync + 'static,
    {
        let source = self.clone();
        let f = Arc::new(f);
        Observable::new(move || SwitchMap::new(source.subscribe(), Arc::clone(&f)))
    }

    /// Suppresses consecutive duplicates.
    pub fn distinct_until_changed(&self) -> Observable<T>
    where
        T: PartialEq,
    {
        self.distinct_until_changed_with(|a, b| a == b)
    }

    /// Suppresses consecutive values whose `key` is unchanged.
    pub fn distinct_until_changed_by<K, F>(&self, key: F) -> Observable<T>
    where
        K: PartialEq,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        self.distinct_until_changed_with(move |a, b| key(a) == key(b))
    }

    /// Suppresses consecutive values that `eq` considers equal.
    pub fn distinct_until_changed_with<F>(&self, eq: F) -> Observable<T>
    where
        F: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        let source = self.clone();
        let eq = Arc::new(eq);
        Observable::new(move || {
            let eq = Arc::clone(&eq);
            distinct_until_changed_with(source.subscribe(), move |a: &T, b: &T| eq(a, b))
        })
    }

    /// Emits `value` before the values of every run.
    pub fn start_with(&self, value: T) -> Observable<T> {
        let source = self.clone();
        Observable::new(move || {
            stream::once(ready(StreamItem::Value(value.clone()))).chain(source.subscribe())
        })
    }

    /// Calls `f` with every value, passing it through unchanged.
    pub fn tap<F>(&self, f: F) -> Observable<T>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.filter_map(move |value| {
            f(&value);
            Some(value)
        })
    }

    /// Continues with the sequence returned by `handler` when a run fails.
    pub fn catch_error<F>(&self, handler: F) -> Observable<T>
    where
        F: Fn(SequenceError) -> Observable<T> + Send + Sync + 'static,
    {
        let source = self.clone();
        let handler = Arc::new(handler);
        Observable::new(move || CatchError::new(source.subscribe(), Arc::clone(&handler)))
    }
}
