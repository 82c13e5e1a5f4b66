use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use cdp_adapter::{CapabilityHost, McpStdioHost};
use soulbrowser_breakpoints::Config;
use tokio::sync::OnceCell;

use super::output::OutputFormat;

pub struct CliContext {
    config: Arc<Config>,
    config_path: PathBuf,
    output: OutputFormat,
    host: OnceCell<Arc<McpStdioHost>>,
}

impl CliContext {
    pub fn new(config: Config, config_path: PathBuf, output: OutputFormat) -> Self {
        Self {
            config: Arc::new(config),
            config_path,
            output,
            host: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &Config {
        self.config.as_ref()
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn output(&self) -> &OutputFormat {
        &self.output
    }

    /// Bridge server, spawned on first use and kept for the rest of the command.
    pub async fn host(&self) -> Result<Arc<dyn CapabilityHost>> {
        let host = self
            .host
            .get_or_try_init(|| async {
                McpStdioHost::start(&self.config.bridge)
                    .await
                    .map(Arc::new)
                    .context("failed to start the bridge server (check the bridge section of the config)")
            })
            .await?;
        Ok(Arc::clone(host) as Arc<dyn CapabilityHost>)
    }

    /// Command-line override first, then config/environment.
    pub fn capability_override(&self, cli_value: Option<String>) -> Option<String> {
        cli_value
            .filter(|name| !name.trim().is_empty())
            .or_else(|| self.config.bridge.capability.clone())
    }
}
