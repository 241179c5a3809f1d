//! Tracing subscriber setup

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Install a fmt subscriber filtered by `RUST_LOG`, falling back to the configured level
///
/// Fails if a global subscriber is already set.
pub fn init(logging: &LoggingConfig) -> Result<()> {
    let filter = build_filter(&logging.level)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))
}

fn build_filter(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| anyhow!("Invalid log level `{}`: {}", level, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_accepts_directives() {
        assert!(build_filter("info").is_ok());
        assert!(build_filter("cube_router=trace,cube_db=debug").is_ok());
    }
}
