// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::stream::{self, StreamExt};
use parking_lot::Mutex;
use sharedseq::prelude::*;
use sharedseq::Element;
use sharedseq_test_utils::{
    assert_no_element_emitted, complete, error, next, unwrap_stream, ColdObservable, Recorded,
    TestScheduler,
};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
#[error("{0} reached")]
struct Reached(i32);

#[derive(Debug, thiserror::Error)]
#[error("Source unavailable")]
struct Unavailable;

fn erroring_source(scheduler: &TestScheduler) -> ColdObservable<i32> {
    scheduler.create_cold_observable(vec![next(0, 1), next(0, 2), error(0, "Test")])
}

/// `1..=10` failing in place of `5`.
fn range_failing_at_five() -> Observable<i32> {
    Observable::new(|| {
        stream::iter(1..5)
            .map(StreamItem::Value)
            .chain(stream::once(async {
                StreamItem::Error(SequenceError::user_error(Reached(5)))
            }))
            .chain(stream::iter(6..=10).map(StreamItem::Value))
    })
}

fn range() -> Observable<i32> {
    Observable::from_iter(1..=10)
}

/// Drives `driver` for 100ms and returns what the consumer saw.
async fn record<T: Element>(
    scheduler: &mut TestScheduler,
    driver: &Driver<T>,
) -> Vec<(u64, Recorded<T>)> {
    let observer = scheduler.create_observer();
    let _subscription = driver.drive_with(observer.clone());
    scheduler.advance_by(100).await;
    observer.events()
}

fn at_zero(values: impl IntoIterator<Item = i32>) -> Vec<(u64, Recorded<i32>)> {
    values
        .into_iter()
        .map(|value| next(0, value))
        .chain([complete(0)])
        .collect()
}

#[tokio::test(start_paused = true)]
async fn as_driver_or_emits_the_default_on_failure() -> anyhow::Result<()> {
    // Arrange
    let mut scheduler = TestScheduler::new();
    let driver = erroring_source(&scheduler).observable().as_driver_or(-1);

    // Act
    let events = record(&mut scheduler, &driver).await;

    // Assert
    assert_eq!(events, at_zero([1, 2, -1]));

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn as_driver_or_else_continues_with_the_fallback() -> anyhow::Result<()> {
    // Arrange
    let mut scheduler = TestScheduler::new();
    let source = erroring_source(&scheduler);
    let with_value = source.observable().as_driver_or_else(Driver::just(-1));
    let with_empty = source.observable().as_driver_or_else(Driver::empty());

    // Act
    let first = record(&mut scheduler, &with_value).await;
    let second = record(&mut scheduler, &with_empty).await;

    // Assert
    assert_eq!(first, at_zero([1, 2, -1]));
    assert_eq!(second, vec![next(100, 1), next(100, 2), complete(100)]);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn complete_on_error_keeps_the_values_before_the_failure() -> anyhow::Result<()> {
    // Arrange
    let mut scheduler = TestScheduler::new();
    let driver = range_failing_at_five().as_driver_complete_on_error();

    // Act
    let events = record(&mut scheduler, &driver).await;

    // Assert
    assert_eq!(events, at_zero(1..=4));

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn fallback_value_follows_the_values_before_the_failure() -> anyhow::Result<()> {
    // Arrange
    let mut scheduler = TestScheduler::new();
    let driver = range_failing_at_five().as_driver_or_else(Driver::just(7));

    // Act
    let events = record(&mut scheduler, &driver).await;

    // Assert
    assert_eq!(events, at_zero([1, 2, 3, 4, 7]));

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn fallback_driver_runs_from_its_start() -> anyhow::Result<()> {
    // Arrange
    let mut scheduler = TestScheduler::new();
    let driver = range_failing_at_five().as_driver_or_else(range().as_driver_complete_on_error());

    // Act
    let events = record(&mut scheduler, &driver).await;

    // Assert
    assert_eq!(events, at_zero((1..=4).chain(1..=10)));

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn recover_builds_the_fallback_from_the_failure() -> anyhow::Result<()> {
    // Arrange
    let mut scheduler = TestScheduler::new();
    let driver = range_failing_at_five().as_driver_recover(|failure| {
        let reached = failure.downcast_ref::<Reached>().map_or(0, |r| r.0);
        Driver::just(-reached)
    });

    // Act
    let events = record(&mut scheduler, &driver).await;

    // Assert
    assert_eq!(events, at_zero([1, 2, 3, 4, -5]));

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn defer_mirrors_the_built_driver() -> anyhow::Result<()> {
    // Arrange
    let mut scheduler = TestScheduler::new();
    let source = erroring_source(&scheduler).observable();
    let erroring = Driver::defer(move || Ok::<_, SequenceError>(source.clone().as_driver_or(-1)));
    let ranged = Driver::defer(|| Ok::<_, SequenceError>(range().as_driver_complete_on_error()));

    // Act
    let first = record(&mut scheduler, &erroring).await;
    let second = record(&mut scheduler, &ranged).await;

    // Assert
    assert_eq!(first, at_zero([1, 2, -1]));
    let expected: Vec<_> = (1..=10)
        .map(|value| next(100, value))
        .chain([complete(100)])
        .collect();
    assert_eq!(second, expected);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn failing_defer_only_completes() -> anyhow::Result<()> {
    // Arrange
    let mut scheduler = TestScheduler::new();
    let reporter = FaultReporter::new();
    let mut faults = reporter.faults();
    let driver =
        Driver::<i32>::defer(|| Err::<Driver<i32>, _>(Unavailable)).with_reporter(reporter);

    // Act
    let events = record(&mut scheduler, &driver).await;

    // Assert
    assert_eq!(events, vec![complete(0)]);
    assert_no_element_emitted(&mut faults, 10).await;

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn operators_see_the_recovered_values() -> anyhow::Result<()> {
    // Arrange
    let mut scheduler = TestScheduler::new();
    let driver = erroring_source(&scheduler).observable().as_driver_or(-1);

    // Act
    let mapped = record(&mut scheduler, &driver.map(|x| x + 1)).await;
    let filtered = record(&mut scheduler, &driver.filter(|x| x % 2 == 0)).await;
    let scanned = record(&mut scheduler, &driver.scan(0, |acc, x| acc + x)).await;
    let started = record(&mut scheduler, &driver.start_with(0)).await;

    // Assert
    assert_eq!(mapped, at_zero([2, 3, 0]));
    assert_eq!(filtered, vec![next(100, 2), complete(100)]);
    assert_eq!(
        scanned,
        vec![
            next(200, 0),
            next(200, 1),
            next(200, 3),
            next(200, 2),
            complete(200)
        ]
    );
    assert_eq!(
        started,
        vec![
            next(300, 0),
            next(300, 1),
            next(300, 2),
            next(300, -1),
            complete(300)
        ]
    );

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn tap_sees_every_delivered_value() -> anyhow::Result<()> {
    // Arrange
    let mut scheduler = TestScheduler::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let driver = erroring_source(&scheduler)
        .observable()
        .as_driver_or(-1)
        .tap(move |x| sink.lock().push(*x));

    // Act
    let events = record(&mut scheduler, &driver).await;

    // Assert
    assert_eq!(*seen.lock(), vec![1, 2, -1]);
    assert_eq!(events, at_zero([1, 2, -1]));

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn distinct_until_changed_in_every_form() -> anyhow::Result<()> {
    // Arrange
    let mut scheduler = TestScheduler::new();
    let source = scheduler.create_cold_observable(vec![
        next(0, 1),
        next(0, 2),
        next(0, 2),
        error(0, "Test"),
    ]);
    let driver = source.observable().as_driver_or(-1);

    // Act
    let plain = record(&mut scheduler, &driver.distinct_until_changed()).await;
    let by_key = record(&mut scheduler, &driver.distinct_until_changed_by(|x| *x)).await;
    let with_eq = record(
        &mut scheduler,
        &driver.distinct_until_changed_with(|a, b| a == b),
    )
    .await;

    // Assert
    let values = |time: u64| vec![next(time, 1), next(time, 2), next(time, -1), complete(time)];
    assert_eq!(plain, values(0));
    assert_eq!(by_key, values(100));
    assert_eq!(with_eq, values(200));

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn flat_map_and_merge_of_drivers() -> anyhow::Result<()> {
    // Arrange
    let mut scheduler = TestScheduler::new();
    let driver = erroring_source(&scheduler).observable().as_driver_or(-1);
    let flat = driver.flat_map(|x| Driver::just(x + 1));
    let merged = Driver::merge([flat.clone()]);

    // Act
    let flat_events = record(&mut scheduler, &flat).await;
    let merged_events = record(&mut scheduler, &merged).await;

    // Assert
    assert_eq!(flat_events, at_zero([2, 3, 0]));
    assert_eq!(
        merged_events,
        vec![next(100, 2), next(100, 3), next(100, 0), complete(100)]
    );

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn failing_operator_callbacks_drop_the_element() -> anyhow::Result<()> {
    // Arrange
    let mut scheduler = TestScheduler::new();
    let reporter = FaultReporter::new();
    let mut faults = reporter.faults();
    let driver = range().as_driver_complete_on_error().with_reporter(reporter);
    let reject_five = |x: i32| if x == 5 { Err(Reached(x)) } else { Ok(x) };

    // Act
    let mapped = record(&mut scheduler, &driver.try_map(reject_five)).await;
    let filtered = record(
        &mut scheduler,
        &driver.try_filter(move |x| reject_five(*x).map(|_| true)),
    )
    .await;
    let flat = record(
        &mut scheduler,
        &driver.try_flat_map(move |x| reject_five(x).map(Driver::just)),
    )
    .await;

    // Assert
    let expected = |time: u64| -> Vec<(u64, Recorded<i32>)> {
        (1..=10)
            .filter(|x| *x != 5)
            .map(|x| next(time, x))
            .chain([complete(time)])
            .collect()
    };
    assert_eq!(mapped, expected(0));
    assert_eq!(filtered, expected(100));
    assert_eq!(flat, expected(200));
    for _ in 0..3 {
        let fault = unwrap_stream(&mut faults, 10).await;
        assert_eq!(fault.downcast_ref::<Reached>().map(|r| r.0), Some(5));
    }
    assert_no_element_emitted(&mut faults, 10).await;

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn failing_drive_callback_is_reported_once_and_delivery_goes_on() -> anyhow::Result<()> {
    // Arrange
    let mut scheduler = TestScheduler::new();
    let reporter = FaultReporter::new();
    let mut faults = reporter.faults();
    let driver = range().as_driver_complete_on_error().with_reporter(reporter);
    let delivered = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&delivered);

    // Act
    let _subscription = driver.drive(move |x| {
        if x == 3 {
            return Err(Reached(x));
        }
        sink.lock().push(x);
        Ok(())
    });
    scheduler.advance_to(100).await;

    // Assert
    assert_eq!(*delivered.lock(), vec![1, 2, 4, 5, 6, 7, 8, 9, 10]);
    let fault = unwrap_stream(&mut faults, 10).await;
    assert_eq!(fault.downcast_ref::<Reached>().map(|r| r.0), Some(3));
    assert_no_element_emitted(&mut faults, 10).await;

    Ok(())
}
