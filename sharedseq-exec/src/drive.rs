// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Attaching consumers to shared sequences.
//!
//! [`DriveExt::drive`] is the isolating form: a failing `on_next` is
//! reported to the sequence's [`FaultReporter`](sharedseq_core::FaultReporter)
//! and delivery carries on with the next value.
//!
//! [`DriveExt::drive_with`] hands every event to an [`Observer`] as is.
//!
//! Both attach immediately (taking part in the share's ref-count) and deliver
//! on the policy's scheduler.

use crate::Disposable;
use core::future::poll_fn;
use core::pin::pin;
use core::task::Poll;
use futures::StreamExt;
use futures_util::future::{select, Either};
use parking_lot::Mutex;
use sharedseq_core::{
    CancellationToken, Element, FaultReporter, IntoSequenceError, Observer, SequenceError,
    StreamItem, Task,
};
use sharedseq_stream::{BoxItemStream, SharedSequence, SharingPolicy};
use std::marker::PhantomData;
use std::sync::Arc;

type RunSlot<T> = Arc<Mutex<Option<BoxItemStream<T>>>>;

enum Delivery<T> {
    Item(StreamItem<T>),
    Ended,
    Detached,
}

/// Consumer attachment for [`SharedSequence`].
pub trait DriveExt<T: Element> {
    /// Calls `on_next` for every value.
    ///
    /// An `Err` from `on_next` is reported and does not end the
    /// subscription. A failure reaching this consumer is escalated, as shared
    /// sequences are not supposed to fail.
    fn drive<F, E>(&self, on_next: F) -> Disposable
    where
        F: FnMut(T) -> Result<(), E> + Send + 'static,
        E: IntoSequenceError + 'static;

    /// Forwards every event to `observer`, without isolation.
    fn drive_with<O>(&self, observer: O) -> Disposable
    where
        O: Observer<T>;
}

impl<T: Element, P: SharingPolicy> DriveExt<T> for SharedSequence<T, P> {
    fn drive<F, E>(&self, on_next: F) -> Disposable
    where
        F: FnMut(T) -> Result<(), E> + Send + 'static,
        E: IntoSequenceError + 'static,
    {
        let observer = IsolatingObserver {
            on_next,
            reporter: self.reporter().clone(),
            _error: PhantomData,
        };
        attach(self, observer)
    }

    fn drive_with<O>(&self, observer: O) -> Disposable
    where
        O: Observer<T>,
    {
        attach(self, observer)
    }
}

struct IsolatingObserver<F, E> {
    on_next: F,
    reporter: FaultReporter,
    _error: PhantomData<fn() -> E>,
}

impl<T, F, E> Observer<T> for IsolatingObserver<F, E>
where
    F: FnMut(T) -> Result<(), E> + Send + 'static,
    E: IntoSequenceError + 'static,
{
    fn on_next(&mut self, value: T) {
        if let Err(e) = (self.on_next)(value) {
            self.reporter.report(e.into_sequence_error());
        }
    }

    fn on_error(&mut self, error: SequenceError) {
        self.reporter.escalate(error);
    }

    fn on_completed(&mut self) {}
}

fn attach<T, P, O>(sequence: &SharedSequence<T, P>, observer: O) -> Disposable
where
    T: Element,
    P: SharingPolicy,
    O: Observer<T>,
{
    let run: RunSlot<T> = Arc::new(Mutex::new(Some(sequence.as_observable().subscribe())));

    let task_run = Arc::clone(&run);
    let task = Task::spawn(&P::scheduler(), move |cancel| {
        deliver(task_run, observer, cancel)
    });

    Disposable::new(task, move || {
        let run = run.lock().take();
        drop(run);
    })
}

async fn deliver<T, O>(run: RunSlot<T>, mut observer: O, cancel: CancellationToken)
where
    T: Element,
    O: Observer<T>,
{
    loop {
        let next = poll_fn(|cx| match run.lock().as_mut() {
            Some(stream) => stream.poll_next_unpin(cx).map(|item| match item {
                Some(item) => Delivery::Item(item),
                None => Delivery::Ended,
            }),
            None => Poll::Ready(Delivery::Detached),
        });
        let cancelled = pin!(cancel.cancelled());

        let delivery = match select(next, cancelled).await {
            Either::Left((delivery, _)) if !cancel.is_cancelled() => delivery,
            _ => return,
        };

        match delivery {
            Delivery::Item(StreamItem::Value(value)) => observer.on_next(value),
            Delivery::Item(StreamItem::Error(e)) => {
                observer.on_error(e);
                break;
            }
            Delivery::Ended => {
                observer.on_completed();
                break;
            }
            Delivery::Detached => return,
        }
    }

    let finished = run.lock().take();
    drop(finished);
}
