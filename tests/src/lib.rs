//! Outguard Testing Framework
//!
//! Provides utilities for testing the governance pipeline without a live
//! generation engine.

pub mod notifier;
pub mod regenerator;

pub use notifier::{RecordingNotifier, step_name};
pub use regenerator::ScriptedRegenerator;

use std::sync::Once;
use tracing_subscriber::EnvFilter;

/// Install a test subscriber once per process. Honors `RUST_LOG`, defaults
/// to `debug`.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
