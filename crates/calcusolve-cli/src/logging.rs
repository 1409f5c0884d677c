//! Logging initialization.
//!
//! Logs go to stderr so stdout only carries results. `RUST_LOG` overrides the
//! level chosen by `-q`/`-v`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Verbosity;

/// Builds the filter for `verbosity`, preferring `RUST_LOG` when set
#[must_use]
pub fn env_filter(verbosity: Verbosity) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()))
}

/// Installs the global subscriber. Later calls are ignored.
pub fn init_logging(verbosity: Verbosity, color: bool) {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(color)
        .with_target(verbosity.is_verbose());

    // Err only when a subscriber is already installed
    let _ = tracing_subscriber::registry()
        .with(env_filter(verbosity))
        .with(layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        init_logging(Verbosity::Quiet, false);
        init_logging(Verbosity::Debug, false);
        tracing::debug!("logging initialized");
    }
}
