// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Consumer attachment for shared sequences.
//!
//! # Example
//!
//! ```
//! use sharedseq_exec::DriveExt;
//! use sharedseq_stream::Driver;
//! use std::sync::{Arc, Mutex};
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("rejected {0}")]
//! struct Rejected(i32);
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//!
//! let subscription = Driver::from_iter(1..=3).drive(move |x| {
//!     if x == 2 {
//!         return Err(Rejected(x));
//!     }
//!     sink.lock().unwrap().push(x);
//!     Ok(())
//! });
//!
//! tokio::time::sleep(std::time::Duration::from_millis(10)).await;
//! assert_eq!(*seen.lock().unwrap(), vec![1, 3]);
//! subscription.dispose();
//! # }
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod disposable;
pub mod drive;

pub use disposable::Disposable;
pub use drive::DriveExt;
