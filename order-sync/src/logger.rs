//! Logging setup

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::Config;

/// Install the global tracing subscriber
///
/// `RUST_LOG` overrides `level` when set. Fails if a global subscriber is
/// already installed.
pub fn init_logger(level: &str, json_format: bool) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(env_filter);

    if json_format {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true),
            )
            .try_init()?;
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()?;
    }

    Ok(())
}

pub fn init_from_config(config: &Config) -> anyhow::Result<()> {
    init_logger(&config.log_level, config.log_json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_rejected() {
        // Another test may have installed a subscriber first; either way the
        // global slot is taken afterwards
        let _ = init_logger("debug", false);
        assert!(init_logger("debug", true).is_err());
    }
}
