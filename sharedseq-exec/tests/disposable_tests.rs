// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use sharedseq_exec::DriveExt;
use sharedseq_stream::AsSharedSequenceExt;
use sharedseq_test_utils::{complete, next, SubscriptionRecord, TestScheduler};

#[tokio::test(start_paused = true)]
async fn disposed_consumer_receives_nothing_more() -> anyhow::Result<()> {
    // Arrange
    let mut scheduler = TestScheduler::new();
    let observer = scheduler.create_observer();
    let source = scheduler.create_cold_observable(vec![next(10, 1), next(20, 2), complete(30)]);
    let driver = source.observable().as_driver_complete_on_error();
    let subscription = driver.drive_with(observer.clone());

    // Act
    scheduler.advance_to(15).await;
    subscription.dispose();
    scheduler.advance_to(100).await;

    // Assert
    assert!(subscription.is_disposed());
    assert_eq!(observer.events(), vec![next(10, 1)]);
    assert!(!observer.is_completed());

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn disposing_the_last_consumer_releases_the_source_synchronously() -> anyhow::Result<()> {
    // Arrange
    let mut scheduler = TestScheduler::new();
    let source = scheduler.create_cold_observable(vec![next(10, 1), next(20, 2), next(30, 3)]);
    let driver = source.observable().as_driver_complete_on_error().map(|x| x + 1);
    let first = driver.drive(|_| Ok::<(), std::fmt::Error>(()));
    let second = driver.drive(|_| Ok::<(), std::fmt::Error>(()));
    scheduler.advance_to(15).await;

    // Act
    first.dispose();
    let still_attached = source.subscriptions();
    second.dispose();

    // Assert
    assert_eq!(
        still_attached,
        vec![SubscriptionRecord {
            subscribed: 0,
            unsubscribed: None,
        }]
    );
    assert_eq!(
        source.subscriptions(),
        vec![SubscriptionRecord {
            subscribed: 0,
            unsubscribed: Some(15),
        }]
    );

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn dropping_the_handle_disposes() -> anyhow::Result<()> {
    // Arrange
    let mut scheduler = TestScheduler::new();
    let observer = scheduler.create_observer();
    let source = scheduler.create_cold_observable(vec![next(10, 1), next(20, 2)]);
    let driver = source.observable().as_driver_complete_on_error();

    // Act
    {
        let _subscription = driver.drive_with(observer.clone());
        scheduler.advance_to(15).await;
    }
    scheduler.advance_to(100).await;

    // Assert
    assert_eq!(observer.events(), vec![next(10, 1)]);
    assert_eq!(source.subscriptions()[0].unsubscribed, Some(15));

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn dispose_is_idempotent() -> anyhow::Result<()> {
    // Arrange
    let scheduler = TestScheduler::new();
    let source = scheduler.create_cold_observable(vec![next(10, 1), complete(20)]);
    let driver = source.observable().as_driver_complete_on_error();
    let subscription = driver.drive(|_| Ok::<(), std::fmt::Error>(()));

    // Act
    subscription.dispose();
    subscription.dispose();

    // Assert
    assert!(subscription.is_disposed());
    assert_eq!(source.subscriptions().len(), 1);
    assert_eq!(source.subscriptions()[0].unsubscribed, Some(0));

    Ok(())
}
