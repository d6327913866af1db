// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::SequenceError;

/// Receiver of the three events of a sequence run.
///
/// At most one of `on_error` / `on_completed` is called, and nothing is called
/// after it.
pub trait Observer<T>: Send + 'static {
    /// Called for every value.
    fn on_next(&mut self, value: T);

    /// Called when the run terminates with a failure.
    fn on_error(&mut self, error: SequenceError);

    /// Called when the run completes.
    fn on_completed(&mut self);
}

/// An [`Observer`] assembled from three closures.
///
/// ```
/// use sharedseq_core::{observer_fn, Observer};
///
/// let mut observer = observer_fn(
///     |value: i32| println!("next {value}"),
///     |error| println!("error {error}"),
///     || println!("completed"),
/// );
/// observer.on_next(1);
/// observer.on_completed();
/// ```
pub struct CallbackObserver<N, E, C> {
    on_next: N,
    on_error: E,
    on_completed: C,
}

/// Builds a [`CallbackObserver`].
pub fn observer_fn<T, N, E, C>(on_next: N, on_error: E, on_completed: C) -> CallbackObserver<N, E, C>
where
    N: FnMut(T) + Send + 'static,
    E: FnMut(SequenceError) + Send + 'static,
    C: FnMut() + Send + 'static,
{
    CallbackObserver {
        on_next,
        on_error,
        on_completed,
    }
}

impl<T, N, E, C> Observer<T> for CallbackObserver<N, E, C>
where
    N: FnMut(T) + Send + 'static,
    E: FnMut(SequenceError) + Send + 'static,
    C: FnMut() + Send + 'static,
{
    fn on_next(&mut self, value: T) {
        (self.on_next)(value);
    }

    fn on_error(&mut self, error: SequenceError) {
        (self.on_error)(error);
    }

    fn on_completed(&mut self) {
        (self.on_completed)();
    }
}
