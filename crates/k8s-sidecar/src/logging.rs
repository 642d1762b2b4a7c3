//! Process-wide log setup.
//!
//! Library code logs through the `log` facade; [`init`] routes those records
//! into a `tracing` subscriber that prints text or JSON lines.

use std::sync::Once;

use tracing::subscriber::set_global_default;
use tracing_log::LogTracer;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

use crate::config::LogFormat;
use crate::error::LoggingError;

/// Filter used when `RUST_LOG` is unset or unparsable.
const DEFAULT_FILTER: &str = "info";

static INIT_TEST_LOGGING: Once = Once::new();

/// Installs the global subscriber. Fails if one is already installed.
pub fn init(format: LogFormat) -> Result<(), LoggingError> {
    LogTracer::init()?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let registry = Registry::default().with(filter);

    match format {
        LogFormat::Text => set_global_default(registry.with(fmt::layer()))?,
        LogFormat::Json => set_global_default(registry.with(fmt::layer().json()))?,
    }

    Ok(())
}

/// Initializes logging once for tests when `ENABLE_TRACING` is set:
/// ```bash
/// ENABLE_TRACING=1 cargo test test_name
/// ```
pub fn init_test_logging() {
    INIT_TEST_LOGGING.call_once(|| {
        if std::env::var("ENABLE_TRACING").is_ok() {
            if let Err(e) = init(LogFormat::Text) {
                eprintln!("Failed to initialize test logging: {}", e);
            }
        }
    });
}
