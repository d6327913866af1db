// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::observable::{BoxItemStream, Observable};
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::{Stream, StreamExt};
use sharedseq_core::{Element, StreamItem};
use std::sync::Arc;

/// Merges the runs of every inner sequence produced from the source values.
///
/// Inner runs are polled in the order they were started, so values that are
/// ready at the same instant come out in that order. Completes once the source
/// and every inner run completed; the first failure from any of them ends it.
pub(crate) struct FlatMap<T, U, F> {
    outer: Option<BoxItemStream<T>>,
    inners: Vec<BoxItemStream<U>>,
    f: Arc<F>,
}

impl<T, U, F> FlatMap<T, U, F> {
    pub(crate) fn new(outer: BoxItemStream<T>, f: Arc<F>) -> Self {
        Self {
            outer: Some(outer),
            inners: Vec::new(),
            f,
        }
    }

    fn terminate(&mut self) {
        self.outer = None;
        self.inners.clear();
    }
}

impl<T, U, F> Stream for FlatMap<T, U, F>
where
    T: Element,
    U: Element,
    F: Fn(T) -> Observable<U> + Send + Sync + 'static,
{
    type Item = StreamItem<U>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            let mut started = false;
            if let Some(outer) = this.outer.as_mut() {
                match outer.poll_next_unpin(cx) {
                    Poll::Ready(Some(StreamItem::Value(value))) => {
                        this.inners.push((*this.f)(value).subscribe());
                        started = true;
                    }
                    Poll::Ready(Some(StreamItem::Error(e))) => {
                        this.terminate();
                        return Poll::Ready(Some(StreamItem::Error(e)));
                    }
                    Poll::Ready(None) => this.outer = None,
                    Poll::Pending => {}
                }
            }

            let mut index = 0;
            while index < this.inners.len() {
                match this.inners[index].poll_next_unpin(cx) {
                    Poll::Ready(Some(StreamItem::Value(value))) => {
                        return Poll::Ready(Some(StreamItem::Value(value)));
                    }
                    Poll::Ready(Some(StreamItem::Error(e))) => {
                        this.terminate();
                        return Poll::Ready(Some(StreamItem::Error(e)));
                    }
                    Poll::Ready(None) => {
                        drop(this.inners.remove(index));
                    }
                    Poll::Pending => index += 1,
                }
            }

            if !started {
                break;
            }
        }

        if this.outer.is_none() && this.inners.is_empty() {
            Poll::Ready(None)
        } else {
            Poll::Pending
        }
    }
}
