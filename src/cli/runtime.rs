use std::path::Path;

use anyhow::{Context, Result};
use soulbrowser_breakpoints::{load_config, LoadedConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_logging(level: &str, debug: bool) -> Result<()> {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        level.parse().context("Invalid log level")?
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string())),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(())
}

/// Loads the config file and layers environment overrides on top.
pub async fn load_runtime_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    let mut loaded = load_config(explicit).await?;
    loaded.config.apply_env_overrides();
    Ok(loaded)
}
