// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for shared sequences.
//!
//! [`SequenceError`] is the single failure type carried through a pipeline as
//! [`StreamItem::Error`](crate::StreamItem::Error) and published on the
//! [fault channel](crate::FaultReporter). It is cheap to clone: user errors are kept
//! behind an `Arc`, so every copy of a report still points at the original error.
//!
//! # Examples
//!
//! ```
//! use sharedseq_core::{Result, SequenceError};
//!
//! fn load() -> Result<u32> {
//!     Err(SequenceError::stream_error("source not ready"))
//! }
//!
//! assert!(load().is_err());
//! ```

use std::error::Error;
use std::sync::Arc;

/// Root error type for shared sequence operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SequenceError {
    /// A sequence terminated abnormally for a reason described in `context`.
    #[error("Stream processing error: {context}")]
    StreamProcessingError {
        /// Description of what went wrong
        context: String,
    },

    /// An error returned by user code: a source, a deferred factory, an
    /// operator callback or a consumer.
    #[error("User error: {0}")]
    UserError(#[source] Arc<dyn Error + Send + Sync>),
}

impl SequenceError {
    /// Create a stream processing error with the given context
    pub fn stream_error(context: impl Into<String>) -> Self {
        Self::StreamProcessingError {
            context: context.into(),
        }
    }

    /// Wrap a user error
    pub fn user_error(error: impl Error + Send + Sync + 'static) -> Self {
        Self::UserError(Arc::new(error))
    }

    /// Returns the wrapped user error if it is of type `E`.
    ///
    /// ```
    /// use sharedseq_core::SequenceError;
    ///
    /// #[derive(Debug, thiserror::Error)]
    /// #[error("3 reached")]
    /// struct Reached;
    ///
    /// let error = SequenceError::user_error(Reached);
    /// assert!(error.downcast_ref::<Reached>().is_some());
    /// ```
    #[must_use]
    pub fn downcast_ref<E: Error + 'static>(&self) -> Option<&E> {
        match self {
            Self::UserError(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// Returns `true` if both errors are the same report, i.e. clones of one
    /// user error, or structurally equal non-user errors.
    #[must_use]
    pub fn is_same(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::UserError(a), Self::UserError(b)) => Arc::ptr_eq(a, b),
            (
                Self::StreamProcessingError { context: a },
                Self::StreamProcessingError { context: b },
            ) => a == b,
            _ => false,
        }
    }
}

/// Specialized Result type for shared sequence operations
pub type Result<T> = std::result::Result<T, SequenceError>;

/// Extension trait for converting errors into `SequenceError`
///
/// Implemented for every `std::error::Error + Send + Sync + 'static`. A
/// `SequenceError` converts to itself; anything else becomes a `UserError`.
pub trait IntoSequenceError {
    /// Convert this error into a `SequenceError`
    fn into_sequence_error(self) -> SequenceError;
}

impl<E: Error + Send + Sync + 'static> IntoSequenceError for E {
    fn into_sequence_error(self) -> SequenceError {
        let boxed: Box<dyn Error + Send + Sync> = Box::new(self);
        match boxed.downcast::<SequenceError>() {
            Ok(error) => *error,
            Err(other) => SequenceError::UserError(Arc::from(other)),
        }
    }
}
