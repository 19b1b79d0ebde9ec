//! Shared test setup: tracing initialization for integration tests.

use std::sync::Once;

use tracing::info;
use tracing_subscriber::EnvFilter;

static TEST_SETUP: Once = Once::new();

/// Initialize tracing once per test binary. `RUST_LOG` wins when set.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
        info!("test setup complete");
    });
}
