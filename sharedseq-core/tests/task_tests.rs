// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::channel::oneshot;
use sharedseq_core::{Task, TokioScheduler};

#[tokio::test]
async fn dropping_a_task_cancels_it() {
    // Arrange
    let (done_tx, done_rx) = oneshot::channel();
    let task = Task::spawn(&TokioScheduler, |cancel| async move {
        cancel.cancelled().await;
        let _ = done_tx.send(());
    });

    // Act
    assert!(!task.is_cancelled());
    drop(task);

    // Assert
    assert!(done_rx.await.is_ok());
}

#[tokio::test]
async fn cancel_signals_without_dropping() {
    // Arrange
    let (done_tx, done_rx) = oneshot::channel();
    let task = Task::spawn(&TokioScheduler, |cancel| async move {
        cancel.cancelled().await;
        let _ = done_tx.send(());
    });

    // Act
    task.cancel();

    // Assert
    assert!(task.is_cancelled());
    assert!(done_rx.await.is_ok());
}
