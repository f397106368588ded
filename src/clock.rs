//! Injectable sleep dependency.
//!
//! Scroll-settle polling and inter-retry delays go through [`Sleeper`] so unit
//! tests can run the whole engine without real time passing.

use std::time::Duration;

#[async_trait::async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by the tokio timer.
#[derive(Debug, Default)]
pub struct TokioSleeper;

#[async_trait::async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Sleeper that returns immediately; used by deterministic tests.
#[derive(Debug, Default)]
pub struct NoopSleeper;

#[async_trait::async_trait]
impl Sleeper for NoopSleeper {
    async fn sleep(&self, _duration: Duration) {}
}
