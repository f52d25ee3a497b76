//! Shared fixtures for integration tests.

#![allow(dead_code)]

pub mod models;
pub mod recording;

use std::sync::Once;

/// Install a test-friendly tracing subscriber once per test binary.
///
/// Honors `RUST_LOG`; defaults to `debug` for this crate.
pub fn init_test_env() {
    use tracing_subscriber::{fmt, EnvFilter};

    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("docquery=debug"));

        fmt().with_env_filter(filter).with_test_writer().init();
    });
}
