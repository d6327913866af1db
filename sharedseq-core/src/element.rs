// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// Bounds every value flowing through a shared sequence must satisfy.
///
/// Values are cloned once per attached consumer and once into the replay
/// buffer, and cross task boundaries on the delivery scheduler.
pub trait Element: Clone + Send + Sync + 'static {}

impl<T> Element for T where T: Clone + Send + Sync + 'static {}
