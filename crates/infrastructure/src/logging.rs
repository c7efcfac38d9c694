//! Logging bootstrap

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global `tracing` subscriber.
///
/// The filter comes from `RUST_LOG` when set and from `default_filter`
/// otherwise. Returns false if a subscriber was already installed, in which
/// case the existing one is kept.
pub fn init_tracing(default_filter: &str) -> bool {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_filter))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_initialisation_is_harmless() {
        init_tracing("debug");
        assert!(!init_tracing("info"));
    }
}
