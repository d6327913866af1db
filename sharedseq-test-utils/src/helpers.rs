// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::stream::{Stream, StreamExt};
use std::time::Duration;
use tokio::time::sleep;

const SETTLE_ROUNDS: usize = 64;

/// Lets every task made ready at the current instant run, without moving the clock.
pub async fn settle() {
    for _ in 0..SETTLE_ROUNDS {
        tokio::task::yield_now().await;
    }
}

/// Awaits the next item, panicking if none arrives within `timeout_ms`.
pub async fn unwrap_stream<S, T>(stream: &mut S, timeout_ms: u64) -> T
where
    S: Stream<Item = T> + Unpin,
{
    tokio::select! {
        item = stream.next() => item.expect("stream ended, expected an item"),
        _ = sleep(Duration::from_millis(timeout_ms)) => {
            panic!("no item emitted within {timeout_ms}ms");
        }
    }
}

pub async fn assert_no_element_emitted<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
{
    tokio::select! {
        item = stream.next() => {
            assert!(item.is_none(), "Unexpected element emitted, expected no output.");
            panic!("Stream ended, expected it to stay open.");
        }
        _ = sleep(Duration::from_millis(timeout_ms)) => {}
    }
}

pub async fn assert_stream_ended<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
{
    tokio::select! {
        item = stream.next() => {
            assert!(item.is_none(), "Unexpected element emitted, expected the stream to end.");
        }
        _ = sleep(Duration::from_millis(timeout_ms)) => {
            panic!("Stream did not end within {timeout_ms}ms");
        }
    }
}
