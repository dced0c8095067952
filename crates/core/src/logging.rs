//! Log subscriber setup

use tracing_subscriber::EnvFilter;

use crate::config::CoreConfig;

/// Install the global `tracing` subscriber
///
/// `RUST_LOG` wins over the configured filter. Returns `false` when a
/// subscriber was already installed, which leaves the existing one in place.
pub fn init(config: &CoreConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_filter()))
        .unwrap_or_else(|e| {
            eprintln!("Invalid log filter {:?}: {}", config.log_filter(), e);
            EnvFilter::new("info")
        });

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.debug)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("stagehook {} logging at {}", env!("CARGO_PKG_VERSION"), config.log_filter());
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        let config = CoreConfig::default();
        init(&config);
        assert!(!init(&config));
    }
}
