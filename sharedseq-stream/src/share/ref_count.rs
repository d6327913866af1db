// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Reference-counted, replay-one connection to a cold source.

use crate::observable::{BoxItemStream, Observable};
use core::future::poll_fn;
use core::pin::{pin, Pin};
use core::task::{Context, Poll};
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::future::{select, Either};
use futures::{Stream, StreamExt};
use parking_lot::Mutex;
use sharedseq_core::{CancellationToken, Element, Scheduler, SequenceError, StreamItem, Task};
use std::sync::Arc;

type UpstreamSlot<T> = Arc<Mutex<Option<BoxItemStream<T>>>>;

struct Connection<T> {
    generation: u64,
    subscribers: Vec<(u64, UnboundedSender<StreamItem<T>>)>,
    last: Option<T>,
    upstream: UpstreamSlot<T>,
    task: Task,
}

impl<T> Connection<T> {
    /// Stops forwarding and drops the upstream run on the calling thread.
    fn disconnect(self) {
        self.task.cancel();
        let upstream = self.upstream.lock().take();
        drop(upstream);
    }
}

struct ShareState<T> {
    connection: Option<Connection<T>>,
    next_id: u64,
    next_generation: u64,
}

/// Multicasts one run of `source` to every attached subscriber.
///
/// - The first subscriber connects: the source is subscribed once and a
///   forwarding task starts on `scheduler`.
/// - Every later subscriber first receives the most recent value, then
///   shares the live run.
/// - When the last subscriber detaches, the run is dropped synchronously and
///   the replay buffer is discarded. The next subscriber starts over.
/// - When the run terminates, every subscriber receives the terminal event and
///   the connection resets the same way.
pub struct RefCountReplay<T, S> {
    source: Observable<T>,
    scheduler: S,
    state: Arc<Mutex<ShareState<T>>>,
}

impl<T: Element, S: Scheduler> RefCountReplay<T, S> {
    /// Creates a disconnected share of `source`.
    pub fn new(source: Observable<T>, scheduler: S) -> Self {
        Self {
            source,
            scheduler,
            state: Arc::new(Mutex::new(ShareState {
                connection: None,
                next_id: 0,
                next_generation: 0,
            })),
        }
    }

    /// Attaches a subscriber, connecting to the source if needed.
    pub fn attach(&self) -> ReplaySubscription<T> {
        let (tx, rx) = mpsc::unbounded();
        let mut state = self.state.lock();
        let id = state.next_id;
        state.next_id += 1;

        let generation = if let Some(connection) = state.connection.as_mut() {
            if let Some(last) = &connection.last {
                let _ = tx.unbounded_send(StreamItem::Value(last.clone()));
            }
            connection.subscribers.push((id, tx));
            connection.generation
        } else {
            let generation = state.next_generation;
            state.next_generation += 1;

            let upstream: UpstreamSlot<T> = Arc::new(Mutex::new(Some(self.source.subscribe())));
            let task = Task::spawn(&self.scheduler, |cancel| {
                forward(
                    Arc::clone(&self.state),
                    Arc::clone(&upstream),
                    generation,
                    cancel,
                )
            });
            state.connection = Some(Connection {
                generation,
                subscribers: vec![(id, tx)],
                last: None,
                upstream,
                task,
            });
            sharedseq_core::debug!("sharedseq: share connected (generation {})", generation);
            generation
        };
        drop(state);

        ReplaySubscription {
            rx,
            state: Arc::clone(&self.state),
            id,
            generation,
        }
    }

    /// Returns the number of attached subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.state
            .lock()
            .connection
            .as_ref()
            .map_or(0, |connection| connection.subscribers.len())
    }

    /// Returns `true` while a run of the source is shared.
    pub fn is_connected(&self) -> bool {
        self.state.lock().connection.is_some()
    }

    /// Turns the share into a sequence whose subscriptions attach to it.
    pub fn into_observable(self) -> Observable<T> {
        Observable::new(move || self.attach())
    }
}

async fn forward<T: Element>(
    state: Arc<Mutex<ShareState<T>>>,
    upstream: UpstreamSlot<T>,
    generation: u64,
    cancel: CancellationToken,
) {
    loop {
        let next = poll_fn(|cx| match upstream.lock().as_mut() {
            Some(run) => run.poll_next_unpin(cx),
            None => Poll::Ready(None),
        });
        let cancelled = pin!(cancel.cancelled());

        let item = match select(next, cancelled).await {
            Either::Left((item, _)) => item,
            Either::Right(_) => return,
        };

        match item {
            Some(StreamItem::Value(value)) => {
                let mut state = state.lock();
                let Some(connection) = state
                    .connection
                    .as_mut()
                    .filter(|connection| connection.generation == generation)
                else {
                    return;
                };
                connection.last = Some(value.clone());
                for (_, tx) in &connection.subscribers {
                    let _ = tx.unbounded_send(StreamItem::Value(value.clone()));
                }
            }
            Some(StreamItem::Error(e)) => {
                terminate(&state, generation, Some(e));
                return;
            }
            None => {
                terminate(&state, generation, None);
                return;
            }
        }
    }
}

fn terminate<T: Element>(
    state: &Mutex<ShareState<T>>,
    generation: u64,
    error: Option<SequenceError>,
) {
    let connection = {
        let mut state = state.lock();
        match state.connection.as_ref() {
            Some(connection) if connection.generation == generation => state.connection.take(),
            _ => None,
        }
    };

    if let Some(connection) = connection {
        if let Some(error) = error {
            for (_, tx) in &connection.subscribers {
                let _ = tx.unbounded_send(StreamItem::Error(error.clone()));
            }
        }
        sharedseq_core::debug!("sharedseq: shared run terminated (generation {})", generation);
        connection.disconnect();
    }
}

fn detach<T>(state: &Mutex<ShareState<T>>, id: u64, generation: u64) {
    let released = {
        let mut state = state.lock();
        let now_empty = match state.connection.as_mut() {
            Some(connection) if connection.generation == generation => {
                connection.subscribers.retain(|(subscriber, _)| *subscriber != id);
                connection.subscribers.is_empty()
            }
            _ => false,
        };
        if now_empty {
            state.connection.take()
        } else {
            None
        }
    };

    if let Some(connection) = released {
        sharedseq_core::debug!("sharedseq: last subscriber left (generation {})", generation);
        connection.disconnect();
    }
}

/// One subscriber's view of a [`RefCountReplay`]. Dropping it detaches.
pub struct ReplaySubscription<T> {
    rx: UnboundedReceiver<StreamItem<T>>,
    state: Arc<Mutex<ShareState<T>>>,
    id: u64,
    generation: u64,
}

impl<T> Stream for ReplaySubscription<T> {
    type Item = StreamItem<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_next_unpin(cx)
    }
}

impl<T> Drop for ReplaySubscription<T> {
    fn drop(&mut self) {
        detach(&self.state, self.id, self.generation);
    }
}
