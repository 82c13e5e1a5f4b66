//! Configuration for breakpoint sessions.
//!
//! Loaded from YAML; every section falls back to defaults so an empty file is valid.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use cdp_adapter::BridgeConfig;
use perceiver_structural::OutlineLimits;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const ENV_CAPABILITY: &str = "SOUL_BREAKPOINT_CAPABILITY";
pub const ENV_OPENAI_KEY: &str = "OPENAI_API_KEY";
pub const ENV_PLANNER_MODEL: &str = "SOUL_BREAKPOINT_PLANNER_MODEL";

const LOCAL_CONFIG: &str = "config/config.yaml";
const USER_CONFIG_DIR: &str = "soulbrowser";
const USER_CONFIG_FILE: &str = "breakpoints.yaml";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bridge: BridgeConfig,
    pub outline: OutlineLimits,
    pub planner: PlannerConfig,
}

/// OpenAI-compatible chat-completions endpoint used to produce plans.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub api_base: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
    /// Tried in order; a 429 moves on to the next key.
    pub api_keys: Vec<String>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.1,
            timeout_secs: 60,
            api_keys: Vec::new(),
        }
    }
}

impl PlannerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

pub struct LoadedConfig {
    pub config: Config,
    pub path: PathBuf,
    /// False when defaults were used because no file existed.
    pub from_file: bool,
}

impl Config {
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("Failed to parse config file")
    }

    /// Applies environment overrides on top of whatever was loaded.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| env::var(key).ok());
    }

    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(capability) = non_empty(ENV_CAPABILITY) {
            info!(capability = %capability, "bridge capability overridden from environment");
            self.bridge.capability = Some(capability);
        }
        if let Some(key) = non_empty(ENV_OPENAI_KEY) {
            if !self.planner.api_keys.contains(&key) {
                self.planner.api_keys.push(key);
            }
        }
        if let Some(model) = non_empty(ENV_PLANNER_MODEL) {
            self.planner.model = model;
        }
    }
}

/// Resolves the config location: explicit path, then `./config/config.yaml`,
/// then the per-user config directory.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from(LOCAL_CONFIG);
    if local.exists() {
        return Some(local);
    }
    dirs::config_dir().map(|dir| dir.join(USER_CONFIG_DIR).join(USER_CONFIG_FILE))
}

pub async fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    let Some(path) = resolve_config_path(explicit) else {
        warn!("No config directory available, using defaults");
        return Ok(LoadedConfig {
            config: Config::default(),
            path: PathBuf::from(LOCAL_CONFIG),
            from_file: false,
        });
    };

    if path.exists() {
        let content = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Config::from_yaml(&content)?;
        info!("Loaded configuration from: {}", path.display());
        Ok(LoadedConfig {
            config,
            path,
            from_file: true,
        })
    } else if explicit.is_some() {
        anyhow::bail!("Config file not found: {}", path.display())
    } else {
        warn!("Config file not found, using defaults: {}", path.display());
        Ok(LoadedConfig {
            config: Config::default(),
            path,
            from_file: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn empty_document_yields_defaults() {
        let config = Config::from_yaml("{}").expect("parse");
        assert_eq!(config.outline, OutlineLimits::default());
        assert_eq!(config.bridge.call_timeout_ms, 30_000);
        assert_eq!(config.planner.model, "gpt-4o-mini");
        assert!(config.planner.api_keys.is_empty());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::from_yaml(
            r#"
bridge:
  command: npx
  args: ["chrome-devtools-mcp@latest"]
  capability: chrome-devtools:call_cdp
outline:
  max_depth: 2
planner:
  api_keys: [sk-one, sk-two]
"#,
        )
        .expect("parse");
        assert_eq!(config.bridge.command.as_deref(), Some("npx"));
        assert_eq!(config.bridge.args, vec!["chrome-devtools-mcp@latest"]);
        assert_eq!(config.outline, OutlineLimits::new(2, 12));
        assert_eq!(config.planner.api_keys.len(), 2);
        assert_eq!(config.planner.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn env_overrides_apply_after_file() {
        let mut config = Config::from_yaml("planner:\n  api_keys: [sk-file]\n").expect("parse");
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_CAPABILITY, "custom-tool"),
            (ENV_OPENAI_KEY, "sk-env"),
            (ENV_PLANNER_MODEL, "  "),
        ]);
        config.apply_overrides_from(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.bridge.capability.as_deref(), Some("custom-tool"));
        assert_eq!(config.planner.api_keys, vec!["sk-file", "sk-env"]);
        assert_eq!(config.planner.model, "gpt-4o-mini");
    }

    #[tokio::test]
    async fn explicit_path_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "outline:\n  max_children: 3").expect("write");
        let loaded = load_config(Some(file.path())).await.expect("load");
        assert!(loaded.from_file);
        assert_eq!(loaded.config.outline.max_children, 3);
    }

    #[tokio::test]
    async fn missing_explicit_path_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope.yaml");
        assert!(load_config(Some(&missing)).await.is_err());
    }
}
