//! Tracing bootstrap.
//!
//! Installs the global `tracing` subscriber. Call once at process startup;
//! repeated calls are no-ops so tests can call it freely.

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

static INIT: OnceCell<()> = OnceCell::new();

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable output for development.
    Pretty,
    /// Structured JSON lines for log aggregation.
    Json,
}

/// Initializes the global tracing subscriber.
///
/// The filter is taken from `RUST_LOG` when set, otherwise defaults to
/// `info` for this crate and `warn` elsewhere.
pub fn init(format: LogFormat) {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("warn,wayfarer=info"));

        match format {
            LogFormat::Pretty => {
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_target(true)
                    .try_init();
            }
            LogFormat::Json => {
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .json()
                    .try_init();
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init(LogFormat::Pretty);
        init(LogFormat::Json);
        init(LogFormat::Pretty);
    }
}
