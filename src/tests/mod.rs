mod classify_tests;
mod clear_tests;
mod retry_tests;

use std::sync::Arc;

use crate::clock::NoopSleeper;
use crate::DropdownSession;
use fake_driver::FakeDriver;

// Initialize tracing for tests
#[allow(dead_code)]
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()))
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();
}

/// A session over the fake driver that never sleeps for real.
pub fn session(driver: Arc<FakeDriver>) -> DropdownSession {
    DropdownSession::new(driver).with_sleeper(Arc::new(NoopSleeper))
}
