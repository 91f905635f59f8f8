//! Shared helpers for integration tests.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Install a test-writer tracing subscriber once per test binary.
///
/// `RUST_LOG` controls the level; the default is `debug`.
pub fn init_tracing() {
    static ONCE: Once = Once::new();

    ONCE.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        // Another harness may already own the global subscriber; that is fine.
        let _ = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_test_writer()
            .with_env_filter(filter)
            .try_init();
    });
}
