// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use parking_lot::Mutex;
use sharedseq::prelude::*;
use sharedseq_test_utils::{
    complete, error, next, Recorded, SubscriptionRecord, TestObserver, TestScheduler,
};
use std::sync::Arc;

type Slot = Arc<Mutex<Option<Disposable>>>;

fn slot() -> Slot {
    Arc::new(Mutex::new(None))
}

fn attach_at(
    scheduler: &mut TestScheduler,
    time: u64,
    driver: &Driver<i32>,
    observer: &TestObserver<i32>,
    slot: &Slot,
) {
    let driver = driver.clone();
    let observer = observer.clone();
    let slot = Arc::clone(slot);
    scheduler.schedule_at(time, move || {
        *slot.lock() = Some(driver.drive_with(observer));
    });
}

fn dispose_at(scheduler: &mut TestScheduler, time: u64, slot: &Slot) {
    let slot = Arc::clone(slot);
    scheduler.schedule_at(time, move || {
        if let Some(subscription) = slot.lock().take() {
            subscription.dispose();
        }
    });
}

/// Three consumers come and go around one source run and a resubscription.
async fn share_with_three_consumers(
    terminal: (u64, Recorded<i32>),
) -> [Vec<(u64, Recorded<i32>)>; 3] {
    let mut scheduler = TestScheduler::new();
    let source = scheduler.create_cold_observable(vec![
        next(10, 0),
        next(20, 1),
        next(30, 2),
        next(40, 3),
        terminal,
    ]);
    let driver = source.observable().as_driver_or(-1);
    let observers: [TestObserver<i32>; 3] = [
        scheduler.create_observer(),
        scheduler.create_observer(),
        scheduler.create_observer(),
    ];
    let slots = [slot(), slot(), slot()];

    attach_at(&mut scheduler, 200, &driver, &observers[0], &slots[0]);
    attach_at(&mut scheduler, 225, &driver, &observers[1], &slots[1]);
    dispose_at(&mut scheduler, 235, &slots[0]);
    dispose_at(&mut scheduler, 260, &slots[1]);
    attach_at(&mut scheduler, 260, &driver, &observers[2], &slots[2]);
    dispose_at(&mut scheduler, 285, &slots[2]);

    scheduler.advance_to(1000).await;

    assert_eq!(
        source.subscriptions(),
        vec![
            SubscriptionRecord {
                subscribed: 200,
                unsubscribed: Some(250),
            },
            SubscriptionRecord {
                subscribed: 260,
                unsubscribed: Some(285),
            },
        ]
    );
    observers.map(|observer| observer.events())
}

#[tokio::test(start_paused = true)]
async fn sharing_when_the_source_fails() -> anyhow::Result<()> {
    // Act
    let [first, second, third] = share_with_three_consumers(error(50, "Test")).await;

    // Assert
    assert_eq!(first, vec![next(210, 0), next(220, 1), next(230, 2)]);
    assert_eq!(
        second,
        vec![
            next(225, 1),
            next(230, 2),
            next(240, 3),
            next(250, -1),
            complete(250)
        ]
    );
    assert_eq!(third, vec![next(270, 0), next(280, 1)]);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn sharing_when_the_source_completes() -> anyhow::Result<()> {
    // Act
    let [first, second, third] = share_with_three_consumers(complete(50)).await;

    // Assert
    assert_eq!(first, vec![next(210, 0), next(220, 1), next(230, 2)]);
    assert_eq!(
        second,
        vec![next(225, 1), next(230, 2), next(240, 3), complete(250)]
    );
    assert_eq!(third, vec![next(270, 0), next(280, 1)]);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn switch_map_moves_to_the_latest_driver() -> anyhow::Result<()> {
    // Arrange
    let mut scheduler = TestScheduler::new();
    let observer = scheduler.create_observer();
    let outer = scheduler.create_cold_observable(vec![
        next(0, 0),
        next(1, 1),
        error(2, "Test"),
        complete(3),
    ]);
    let inners = [
        scheduler
            .create_cold_observable(vec![next(0, 1), next(0, 2), error(0, "Test")])
            .observable()
            .as_driver_or(-2),
        scheduler
            .create_cold_observable(vec![next(0, 10), next(0, 11), error(0, "Test")])
            .observable()
            .as_driver_or(-3),
        scheduler
            .create_cold_observable(vec![complete(0)])
            .observable()
            .as_driver_or(-4),
    ];
    let driver = outer
        .observable()
        .as_driver_or(2)
        .switch_map(move |index: i32| inners[index as usize].clone());

    // Act
    let _subscription = driver.drive_with(observer.clone());
    scheduler.advance_to(100).await;

    // Assert
    assert_eq!(
        observer.events(),
        vec![
            next(0, 1),
            next(0, 2),
            next(0, -2),
            next(1, 10),
            next(1, 11),
            next(1, -3),
            complete(2)
        ]
    );

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn switch_map_drops_the_unfinished_driver() -> anyhow::Result<()> {
    // Arrange
    let mut scheduler = TestScheduler::new();
    let observer = scheduler.create_observer();
    let outer = scheduler.create_cold_observable(vec![
        next(0, 0),
        next(1, 1),
        error(2, "Test"),
        complete(3),
    ]);
    let first_inner =
        scheduler.create_cold_observable(vec![next(0, 1), error(0, "Test"), next(1, 2)]);
    let second_inner =
        scheduler.create_cold_observable(vec![next(0, 10), error(0, "Test"), next(1, 11)]);
    let third_inner = scheduler.create_cold_observable(vec![complete(0)]);
    let inners = [
        first_inner.observable().as_driver_or(-2),
        second_inner.observable().as_driver_or(-3),
        third_inner.observable().as_driver_or(-4),
    ];
    let driver = outer
        .observable()
        .as_driver_or(2)
        .switch_map(move |index: i32| inners[index as usize].clone());

    // Act
    let _subscription = driver.drive_with(observer.clone());
    scheduler.advance_to(100).await;

    // Assert
    assert_eq!(
        observer.events(),
        vec![
            next(0, 1),
            next(0, -2),
            next(1, 10),
            next(1, -3),
            complete(2)
        ]
    );
    assert_eq!(first_inner.subscriptions().len(), 1);
    assert_eq!(second_inner.subscriptions().len(), 1);
    assert_eq!(third_inner.subscriptions().len(), 1);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn late_consumer_starts_from_the_latest_value() -> anyhow::Result<()> {
    // Arrange
    let mut scheduler = TestScheduler::new();
    let early = scheduler.create_observer();
    let late = scheduler.create_observer();
    let source = scheduler.create_cold_observable(vec![next(10, 1), next(20, 2), next(30, 3)]);
    let driver = source.observable().as_driver_complete_on_error();
    let (early_slot, late_slot) = (slot(), slot());
    attach_at(&mut scheduler, 0, &driver, &early, &early_slot);
    attach_at(&mut scheduler, 25, &driver, &late, &late_slot);

    // Act
    scheduler.advance_to(100).await;

    // Assert
    assert_eq!(early.values(), vec![1, 2, 3]);
    assert_eq!(late.events(), vec![next(25, 2), next(30, 3)]);
    assert_eq!(source.subscriptions().len(), 1);

    Ok(())
}
