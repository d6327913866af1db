// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Hot broadcast subject.
//!
//! A [`Subject`] pushes each value to every subscriber attached at the time of
//! the push. It backs the [fault channel](crate::FaultReporter).
//!
//! ## Characteristics
//!
//! - **Hot**: Late subscribers do not receive past values.
//! - **Unbounded**: Each subscriber owns an unbounded channel (no backpressure).
//! - **Thread-safe**: Cheap to clone; all clones share the same state.
//!
//! ## Example
//!
//! ```
//! use sharedseq_core::Subject;
//! use futures::StreamExt;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let subject = Subject::<i32>::new();
//! let mut stream = subject.subscribe().unwrap();
//!
//! subject.next(1).unwrap();
//! subject.close();
//!
//! assert_eq!(stream.next().await, Some(1));
//! assert_eq!(stream.next().await, None);
//! # }
//! ```

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::Stream;
use parking_lot::Mutex;
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

/// Errors specific to subject lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectError {
    /// The subject has been closed and cannot accept new values or subscribers.
    Closed,
}

impl fmt::Display for SubjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "Subject is closed"),
        }
    }
}

impl std::error::Error for SubjectError {}

struct SubjectState<T> {
    closed: bool,
    senders: Vec<UnboundedSender<T>>,
}

/// Stream of the values pushed into a [`Subject`] after subscribing.
pub struct SubjectStream<T> {
    rx: UnboundedReceiver<T>,
}

impl<T> Stream for SubjectStream<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        Pin::new(&mut self.rx).poll_next(cx)
    }
}

/// A hot, unbounded subject that broadcasts values to all current subscribers.
///
/// See the [module documentation](self) for details.
pub struct Subject<T: Clone + Send + 'static> {
    state: Arc<Mutex<SubjectState<T>>>,
}

impl<T: Clone + Send + 'static> Subject<T> {
    /// Creates an open subject with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SubjectState {
                closed: false,
                senders: Vec::new(),
            })),
        }
    }

    /// Subscribes to values pushed from now on.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` if the subject has been closed.
    pub fn subscribe(&self) -> Result<SubjectStream<T>, SubjectError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(SubjectError::Closed);
        }

        let (tx, rx) = mpsc::unbounded();
        state.senders.push(tx);
        Ok(SubjectStream { rx })
    }

    /// Pushes a value to every live subscriber, pruning dropped ones.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` if the subject has been closed.
    pub fn next(&self, value: T) -> Result<(), SubjectError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(SubjectError::Closed);
        }

        state
            .senders
            .retain(|tx| tx.unbounded_send(value.clone()).is_ok());
        Ok(())
    }

    /// Closes the subject, completing every subscriber stream.
    ///
    /// Closing is idempotent.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        state.senders.clear();
    }

    /// Returns `true` if the subject has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Returns the number of subscribers.
    ///
    /// Dropped subscribers are pruned on the next `next()` call.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.state.lock().senders.len()
    }
}

impl<T: Clone + Send + 'static> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + 'static> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}
