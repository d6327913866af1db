// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::observable::{BoxItemStream, Observable};
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::{Stream, StreamExt};
use sharedseq_core::{Element, SequenceError, StreamItem};
use std::sync::Arc;

/// Replaces the run with the one produced by `handler` on the first failure.
///
/// Only the source's failure is handled. A failure of the replacement run
/// goes downstream unchanged.
pub(crate) struct CatchError<T, H> {
    current: BoxItemStream<T>,
    handler: Option<Arc<H>>,
}

impl<T, H> CatchError<T, H> {
    pub(crate) fn new(source: BoxItemStream<T>, handler: Arc<H>) -> Self {
        Self {
            current: source,
            handler: Some(handler),
        }
    }
}

impl<T, H> Stream for CatchError<T, H>
where
    T: Element,
    H: Fn(SequenceError) -> Observable<T> + Send + Sync + 'static,
{
    type Item = StreamItem<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            match this.current.poll_next_unpin(cx) {
                Poll::Ready(Some(StreamItem::Error(e))) => match this.handler.take() {
                    Some(handler) => {
                        sharedseq_core::debug!("sharedseq: recovering from failure: {}", e);
                        this.current = handler(e).subscribe();
                    }
                    None => return Poll::Ready(Some(StreamItem::Error(e))),
                },
                other => return other,
            }
        }
    }
}
