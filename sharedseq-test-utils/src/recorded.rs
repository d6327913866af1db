// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Timestamped events recorded by a [`TestObserver`](crate::TestObserver).

use sharedseq_core::SequenceError;

/// One event of a sequence run.
///
/// Failures are kept as their display text so recordings can be compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded<T> {
    /// A value
    Next(T),
    /// A failure, as text
    Error(String),
    /// Completion
    Completed,
}

impl<T> Recorded<T> {
    /// Records a failure.
    pub fn from_error(error: &SequenceError) -> Self {
        Self::Error(error.to_string())
    }

    /// Returns the value of a `Next` event.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Next(value) => Some(value),
            _ => None,
        }
    }
}

/// A value at `time` virtual milliseconds.
pub fn next<T>(time: u64, value: T) -> (u64, Recorded<T>) {
    (time, Recorded::Next(value))
}

/// A failure at `time` virtual milliseconds.
pub fn error<T>(time: u64, message: impl Into<String>) -> (u64, Recorded<T>) {
    (time, Recorded::Error(message.into()))
}

/// Completion at `time` virtual milliseconds.
pub fn complete<T>(time: u64) -> (u64, Recorded<T>) {
    (time, Recorded::Completed)
}
