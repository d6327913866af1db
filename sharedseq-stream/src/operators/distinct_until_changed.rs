// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::future::ready;
use futures::{Stream, StreamExt};
use sharedseq_core::StreamItem;

/// Drops every value that `eq` considers equal to the value right before it.
///
/// The first value of a run is always emitted. Failures pass through.
pub(crate) fn distinct_until_changed_with<S, T, F>(
    source: S,
    eq: F,
) -> impl Stream<Item = StreamItem<T>> + Send + 'static
where
    S: Stream<Item = StreamItem<T>> + Send + 'static,
    T: Clone + Send + 'static,
    F: Fn(&T, &T) -> bool + Send + 'static,
{
    let mut last: Option<T> = None;

    source.filter_map(move |item| {
        ready(match item {
            StreamItem::Value(value) => {
                let changed = last.as_ref().map_or(true, |previous| !eq(previous, &value));
                last = Some(value.clone());
                changed.then_some(StreamItem::Value(value))
            }
            StreamItem::Error(e) => Some(StreamItem::Error(e)),
        })
    })
}
