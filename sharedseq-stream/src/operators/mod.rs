// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Stream-level building blocks behind the [`Observable`](crate::Observable) operators.

pub(crate) mod catch_error;
pub(crate) mod distinct_until_changed;
pub(crate) mod flat_map;
pub(crate) mod scan;
pub(crate) mod switch_map;
pub mod until_error;

pub use until_error::UntilError;
