// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::pin::Pin;
use core::task::{Context, Poll};
use futures::Stream;
use pin_project::pin_project;
use sharedseq_core::StreamItem;

/// Ends the stream right after the first `Error` item.
///
/// The upstream is not polled again once an error went through, so a run
/// never delivers anything after its failure.
#[pin_project]
pub struct UntilError<S> {
    #[pin]
    inner: S,
    terminated: bool,
}

impl<S> UntilError<S> {
    pub(crate) fn new(inner: S) -> Self {
        Self {
            inner,
            terminated: false,
        }
    }
}

impl<S, T> Stream for UntilError<S>
where
    S: Stream<Item = StreamItem<T>>,
{
    type Item = StreamItem<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        if *this.terminated {
            return Poll::Ready(None);
        }

        match this.inner.poll_next(cx) {
            Poll::Ready(Some(StreamItem::Error(e))) => {
                *this.terminated = true;
                Poll::Ready(Some(StreamItem::Error(e)))
            }
            Poll::Ready(None) => {
                *this.terminated = true;
                Poll::Ready(None)
            }
            other => other,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.terminated {
            (0, Some(0))
        } else {
            (0, self.inner.size_hint().1)
        }
    }
}
