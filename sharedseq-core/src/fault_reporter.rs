// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Fault channel: collection and escalation of failures that happen off the
//! normal failure-propagation path.
//!
//! A [`FaultReporter`] is a cheap, cloneable handle. Shared sequences carry one
//! and report operator and consumer callback failures to it. Anyone can observe
//! the reports through [`FaultReporter::faults`].
//!
//! [`FaultReporter::global`] returns the process-wide instance every sequence
//! uses by default; tests usually create an isolated one with
//! [`FaultReporter::new`] and hand it to the pipeline under test.
//!
//! ## Escalation
//!
//! [`FaultReporter::escalate`] reports the fault and then raises a
//! [`FatalError`] on a dedicated background thread, which logs it and aborts
//! the process. The caller that escalated keeps running until the abort lands.
//! Tests that exercise escalation switch this off with
//! [`FaultReporter::set_fatal_suppressed`].
//!
//! ## Example
//!
//! ```
//! use sharedseq_core::{FaultReporter, SequenceError};
//! use futures::StreamExt;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let reporter = FaultReporter::new();
//! let mut faults = reporter.faults();
//!
//! let value = reporter.report_and_fallback(0, || "x".parse::<u32>());
//! assert_eq!(value, 0);
//!
//! let fault = faults.next().await.unwrap();
//! assert!(fault.downcast_ref::<std::num::ParseIntError>().is_some());
//! # }
//! ```

use crate::{IntoSequenceError, Result, SequenceError, Subject};
use futures::stream::{self, Stream, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// The failure raised when a fault is escalated.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Fatal error: {fault}")]
pub struct FatalError {
    /// The escalated fault
    #[source]
    pub fault: SequenceError,
}

struct Inner {
    faults: Subject<SequenceError>,
    fatal_suppressed: AtomicBool,
}

/// Handle to a fault channel.
///
/// See the [module documentation](self) for details.
#[derive(Clone)]
pub struct FaultReporter {
    inner: Arc<Inner>,
}

static GLOBAL: OnceLock<FaultReporter> = OnceLock::new();

impl FaultReporter {
    /// Creates an isolated fault channel with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                faults: Subject::new(),
                fatal_suppressed: AtomicBool::new(false),
            }),
        }
    }

    /// Returns the process-wide fault channel, initializing it on first use.
    #[must_use]
    pub fn global() -> Self {
        GLOBAL.get_or_init(Self::new).clone()
    }

    /// Returns a stream of every fault reported after this call.
    pub fn faults(&self) -> impl Stream<Item = SequenceError> + Send + Unpin + 'static {
        // The subject is never closed, so subscribing only fails after a bug.
        stream::iter(self.inner.faults.subscribe().ok()).flatten()
    }

    /// Publishes `fault` to every current observer.
    pub fn report(&self, fault: SequenceError) {
        crate::warn!("sharedseq: fault reported: {}", fault);
        let _ = self.inner.faults.next(fault);
    }

    /// Runs `action`; on failure reports the error and returns it to the caller.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `action`, converted to `SequenceError`.
    pub fn report_and_rethrow<T, E, F>(&self, action: F) -> Result<T>
    where
        F: FnOnce() -> std::result::Result<T, E>,
        E: IntoSequenceError,
    {
        action().map_err(|error| {
            let fault = error.into_sequence_error();
            self.report(fault.clone());
            fault
        })
    }

    /// Runs `action`; on failure reports the error and returns `default`.
    pub fn report_and_fallback<T, E, F>(&self, default: T, action: F) -> T
    where
        F: FnOnce() -> std::result::Result<T, E>,
        E: IntoSequenceError,
    {
        match action() {
            Ok(value) => value,
            Err(error) => {
                self.report(error.into_sequence_error());
                default
            }
        }
    }

    /// Reports `fault` and, unless suppressed, aborts the process from a
    /// background thread.
    pub fn escalate(&self, fault: SequenceError) {
        self.report(fault.clone());
        if self.is_fatal_suppressed() {
            crate::debug!("sharedseq: fatal escalation suppressed");
            return;
        }
        raise_fatal(FatalError { fault });
    }

    /// Escalates a plain message as a stream processing error.
    pub fn escalate_message(&self, message: impl Into<String>) {
        self.escalate(SequenceError::stream_error(message));
    }

    /// Escalates in debug builds, only reports in release builds.
    pub fn escalate_in_debug(&self, fault: SequenceError) {
        if cfg!(debug_assertions) {
            self.escalate(fault);
        } else {
            self.report(fault);
        }
    }

    /// Runs `action`; on failure escalates the error and returns `default`.
    pub fn escalate_and_fallback<T, E, F>(&self, default: T, action: F) -> T
    where
        F: FnOnce() -> std::result::Result<T, E>,
        E: IntoSequenceError,
    {
        match action() {
            Ok(value) => value,
            Err(error) => {
                self.escalate(error.into_sequence_error());
                default
            }
        }
    }

    /// Stops `escalate` from aborting the process. It still reports.
    ///
    /// Only meant for tests that assert on escalation.
    pub fn set_fatal_suppressed(&self, suppressed: bool) {
        self.inner
            .fatal_suppressed
            .store(suppressed, Ordering::Release);
    }

    /// Returns `true` while fatal escalation is suppressed.
    #[must_use]
    pub fn is_fatal_suppressed(&self) -> bool {
        self.inner.fatal_suppressed.load(Ordering::Acquire)
    }

    /// Returns the number of live fault observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.inner.faults.subscriber_count()
    }
}

impl Default for FaultReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for FaultReporter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FaultReporter")
            .field("observers", &self.observer_count())
            .field("fatal_suppressed", &self.is_fatal_suppressed())
            .finish()
    }
}

fn raise_fatal(fatal: FatalError) {
    let spawned = std::thread::Builder::new()
        .name("sharedseq-fatal".into())
        .spawn(move || {
            crate::error!("sharedseq: {}", fatal);
            std::process::abort();
        });

    if let Err(e) = spawned {
        crate::error!("sharedseq: could not raise fatal error: {}", e);
    }
}
