// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod element;
pub mod error;
pub mod fault_reporter;
#[doc(hidden)]
pub mod logging;
pub mod observer;
pub mod scheduler;
pub mod stream_item;
pub mod subject;
pub mod task;

pub use self::element::Element;
pub use self::error::{IntoSequenceError, Result, SequenceError};
pub use self::fault_reporter::{FatalError, FaultReporter};
pub use self::observer::{observer_fn, CallbackObserver, Observer};
pub use self::scheduler::{Scheduler, TokioScheduler};
pub use self::stream_item::StreamItem;
pub use self::subject::{Subject, SubjectError, SubjectStream};
pub use self::task::Task;
pub use tokio_util::sync::CancellationToken;
