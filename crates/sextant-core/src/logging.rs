//! Logging setup based on `tracing-subscriber`.

use tracing_subscriber::EnvFilter;

/// Default filter directive used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info";

/// Install a formatting subscriber, honouring `RUST_LOG` when present.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init() {
    init_with_filter(DEFAULT_FILTER);
}

/// Install a formatting subscriber with `default_filter` as the fallback
/// directive when `RUST_LOG` is unset or invalid.
pub fn init_with_filter(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_err()
    {
        tracing::trace!("global subscriber already installed");
    }
}
