//! Small helpers shared across the workspace's test and example binaries,
//! trimmed down from `boomerang_util`'s dev-dependency wiring to the one
//! piece this workspace still needs: a tracing subscriber for tests.

use std::sync::Once;

static INIT: Once = Once::new();

/// Install a `tracing_subscriber::fmt` subscriber reading `RUST_LOG`,
/// defaulting to `info`. Safe to call from every test in a suite; only the
/// first call takes effect.
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
            .with_test_writer()
            .init();
    });
}
