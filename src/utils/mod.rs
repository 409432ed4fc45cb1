//! Utility functions shared by applications embedding the engine.

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for logging.
///
/// The filter is read from the `RUST_LOG` environment variable and defaults to
/// `info`. Calling this more than once is harmless: later calls leave the
/// first subscriber in place.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_is_idempotent() {
        init_tracing();
        init_tracing();
        tracing::info!("tracing initialized");
    }
}
