//! Logging initialisation via tracing-subscriber.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Filter from `RUST_LOG`, falling back to `level` from config.
pub fn env_filter(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| anyhow!("invalid log level '{level}': {e}"))
}

/// Install the global subscriber, writing to stderr so stdout stays free.
/// Call once at startup, after settings are loaded.
pub fn init(level: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level)?)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to set subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_levels_and_directives() {
        assert!(env_filter("info").is_ok());
        assert!(env_filter("linkgraph_graph=debug,warn").is_ok());
    }
}
