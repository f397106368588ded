use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use crate::clock::NoopSleeper;
use crate::errors::DropdownError;
use crate::retry::with_retries;

/// Fails until the `succeed_at`-th invocation, then returns the attempt number.
async fn flaky(counter: &AtomicU32, succeed_at: u32) -> Result<u32, DropdownError> {
    let attempt = counter.fetch_add(1, Ordering::SeqCst) + 1;
    if attempt >= succeed_at {
        Ok(attempt)
    } else {
        Err(DropdownError::NotFound(format!("transient, attempt {attempt}")))
    }
}

#[tokio::test]
async fn returns_immediately_on_first_success() {
    let counter = AtomicU32::new(0);
    let result = with_retries(
        || flaky(&counter, 1),
        3,
        Duration::from_millis(10),
        &NoopSleeper,
    )
    .await
    .expect("should succeed");

    assert_eq!(result, 1);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn recovers_after_transient_failures() {
    let counter = AtomicU32::new(0);
    let result = with_retries(
        || flaky(&counter, 3),
        3,
        Duration::from_millis(10),
        &NoopSleeper,
    )
    .await
    .expect("should recover on the third attempt");

    assert_eq!(result, 3);
    assert_eq!(counter.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn surfaces_the_last_error_once_exhausted() {
    let counter = AtomicU32::new(0);
    let err = with_retries(
        || flaky(&counter, u32::MAX),
        2,
        Duration::from_millis(10),
        &NoopSleeper,
    )
    .await
    .expect_err("budget exhausted");

    assert_eq!(counter.load(Ordering::SeqCst), 2);
    match err {
        DropdownError::NotFound(msg) => assert!(msg.contains("attempt 2")),
        other => panic!("expected the last NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn zero_retries_still_attempts_once() {
    let counter = AtomicU32::new(0);
    let _ = with_retries(
        || flaky(&counter, u32::MAX),
        0,
        Duration::from_millis(10),
        &NoopSleeper,
    )
    .await;

    assert_eq!(counter.load(Ordering::SeqCst), 1);
}
