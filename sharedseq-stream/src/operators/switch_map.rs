// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::observable::{BoxItemStream, Observable};
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::{Stream, StreamExt};
use sharedseq_core::{Element, StreamItem};
use std::sync::Arc;

/// Mirrors the inner sequence produced from the latest source value.
///
/// A new source value drops the current inner run before the next one is
/// started. Whatever the current inner run has ready is delivered before the
/// source is polled again.
pub(crate) struct SwitchMap<T, U, F> {
    outer: Option<BoxItemStream<T>>,
    inner: Option<BoxItemStream<U>>,
    f: Arc<F>,
}

impl<T, U, F> SwitchMap<T, U, F> {
    pub(crate) fn new(outer: BoxItemStream<T>, f: Arc<F>) -> Self {
        Self {
            outer: Some(outer),
            inner: None,
            f,
        }
    }

    fn terminate(&mut self) {
        self.outer = None;
        self.inner = None;
    }
}

impl<T, U, F> Stream for SwitchMap<T, U, F>
where
    T: Element,
    U: Element,
    F: Fn(T) -> Observable<U> + Send + Sync + 'static,
{
    type Item = StreamItem<U>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if let Some(inner) = this.inner.as_mut() {
                match inner.poll_next_unpin(cx) {
                    Poll::Ready(Some(StreamItem::Value(value))) => {
                        return Poll::Ready(Some(StreamItem::Value(value)));
                    }
                    Poll::Ready(Some(StreamItem::Error(e))) => {
                        this.terminate();
                        return Poll::Ready(Some(StreamItem::Error(e)));
                    }
                    Poll::Ready(None) => this.inner = None,
                    Poll::Pending => {}
                }
            }

            let Some(outer) = this.outer.as_mut() else {
                break;
            };
            match outer.poll_next_unpin(cx) {
                Poll::Ready(Some(StreamItem::Value(value))) => {
                    // Detach from the previous inner run before starting the next.
                    this.inner = None;
                    this.inner = Some((*this.f)(value).subscribe());
                }
                Poll::Ready(Some(StreamItem::Error(e))) => {
                    this.terminate();
                    return Poll::Ready(Some(StreamItem::Error(e)));
                }
                Poll::Ready(None) => {
                    this.outer = None;
                    break;
                }
                Poll::Pending => break,
            }
        }

        if this.outer.is_none() && this.inner.is_none() {
            Poll::Ready(None)
        } else {
            Poll::Pending
        }
    }
}
