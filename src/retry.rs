//! Bounded retry-with-fixed-delay.
//!
//! Delays are fixed rather than exponential: the timeouts involved are short
//! and the operations idempotent, so back-off buys nothing here.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::clock::Sleeper;
use crate::driver::DriverError;
use crate::errors::DropdownError;

/// Run `operation` up to `retries` times (at least once), sleeping `delay`
/// between attempts, surfacing the last error once the budget is exhausted.
pub async fn with_retries<T, Fut, F>(
    mut operation: F,
    retries: u32,
    delay: Duration,
    sleeper: &dyn Sleeper,
) -> Result<T, DropdownError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DropdownError>>,
{
    let attempts = retries.max(1);
    let mut last_error: Option<DropdownError> = None;

    for attempt in 1..=attempts {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                warn!(attempt, attempts, error = %e, "attempt failed");
                last_error = Some(e);
            }
        }
        if attempt < attempts {
            sleeper.sleep(delay).await;
        }
    }

    Err(last_error.unwrap_or_else(|| {
        DropdownError::Driver(DriverError::Backend(
            "retry loop exhausted without recording an error".to_string(),
        ))
    }))
}
