// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Scripted cold sources that log their subscriptions.

use crate::recorded::Recorded;
use crate::test_observer::millis_since;
use core::pin::Pin;
use core::task::{Context, Poll};
use core::time::Duration;
use futures::stream::{self, Stream, StreamExt};
use parking_lot::Mutex;
use sharedseq_core::{Element, SequenceError, StreamItem};
use sharedseq_stream::{BoxItemStream, Observable};
use std::sync::Arc;
use tokio::time::{sleep_until, Instant};

/// Lifetime of one subscription to a [`ColdObservable`], in virtual milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionRecord {
    /// When the run started
    pub subscribed: u64,
    /// When the run was dropped, if it was
    pub unsubscribed: Option<u64>,
}

/// A source replaying the same script for every subscriber.
///
/// Event times are relative to the moment of subscription. A script without a
/// terminal event never terminates.
pub struct ColdObservable<T> {
    observable: Observable<T>,
    subscriptions: Arc<Mutex<Vec<SubscriptionRecord>>>,
}

impl<T: Element> ColdObservable<T> {
    pub(crate) fn new(origin: Instant, events: Vec<(u64, Recorded<T>)>) -> Self {
        let subscriptions = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&subscriptions);

        let observable = Observable::new(move || {
            let index = {
                let mut log = log.lock();
                log.push(SubscriptionRecord {
                    subscribed: millis_since(origin),
                    unsubscribed: None,
                });
                log.len() - 1
            };
            LoggedRun {
                run: script(events.clone()),
                log: Arc::clone(&log),
                index,
                origin,
            }
        });

        Self {
            observable,
            subscriptions,
        }
    }

    /// The source as an observable.
    pub fn observable(&self) -> Observable<T> {
        self.observable.clone()
    }

    /// Every subscription made so far.
    pub fn subscriptions(&self) -> Vec<SubscriptionRecord> {
        self.subscriptions.lock().clone()
    }
}

fn script<T: Element>(events: Vec<(u64, Recorded<T>)>) -> BoxItemStream<T> {
    let start = Instant::now();
    let at = move |time: u64| start + Duration::from_millis(time);

    let run = stream::unfold(Some(events.into_iter()), move |events| async move {
        let mut events = events?;
        match events.next() {
            Some((time, Recorded::Next(value))) => {
                sleep_until(at(time)).await;
                Some((StreamItem::Value(value), Some(events)))
            }
            Some((time, Recorded::Error(message))) => {
                sleep_until(at(time)).await;
                Some((StreamItem::Error(SequenceError::stream_error(message)), None))
            }
            Some((time, Recorded::Completed)) => {
                sleep_until(at(time)).await;
                None
            }
            None => futures::future::pending().await,
        }
    });
    Box::pin(run)
}

struct LoggedRun<T> {
    run: BoxItemStream<T>,
    log: Arc<Mutex<Vec<SubscriptionRecord>>>,
    index: usize,
    origin: Instant,
}

impl<T> Stream for LoggedRun<T> {
    type Item = StreamItem<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.run.poll_next_unpin(cx)
    }
}

impl<T> Drop for LoggedRun<T> {
    fn drop(&mut self) {
        if let Some(record) = self.log.lock().get_mut(self.index) {
            record.unsubscribed = Some(millis_since(self.origin));
        }
    }
}
