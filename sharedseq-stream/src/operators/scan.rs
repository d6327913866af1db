// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::stream::{self, Stream, StreamExt};
use sharedseq_core::StreamItem;

/// Emits `seed` and then every intermediate accumulation.
///
/// Each run starts again from `seed`.
pub(crate) fn scan_from_seed<S, T, A, F>(
    source: S,
    seed: A,
    accumulate: F,
) -> impl Stream<Item = StreamItem<A>> + Send + 'static
where
    S: Stream<Item = StreamItem<T>> + Send + 'static,
    A: Clone + Send + 'static,
    F: FnMut(A, T) -> A + Send + 'static,
{
    let mut accumulate = accumulate;
    let mut acc = seed.clone();

    stream::once(async move { StreamItem::Value(seed) }).chain(source.map(move |item| {
        item.map(|value| {
            acc = accumulate(acc.clone(), value);
            acc.clone()
        })
    }))
}
