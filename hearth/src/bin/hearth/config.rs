use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "hearth.toml";
const FALLBACK_REDIS_URL: &str = "redis://127.0.0.1/";

/// Where the CLI found its configuration, and what it says
pub struct HearthContext {
    /// Path of the loaded config file, if one was found
    pub config_path: Option<PathBuf>,
    pub config: HearthConfig,
}

/// Configuration stored in hearth.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HearthConfig {
    #[serde(default)]
    pub redis: RedisSettings,
    #[serde(default)]
    pub store: StoreSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisSettings {
    #[serde(default = "default_redis_url")]
    pub url: String,
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
        }
    }
}

fn default_redis_url() -> String {
    "${REDIS_URL}".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Key prefix every record lives under
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
        }
    }
}

fn default_prefix() -> String {
    "hearth".to_string()
}

impl HearthContext {
    /// Load an explicit config file, or search from the current directory upward
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let current_dir = std::env::current_dir().context("Failed to get current directory")?;
                Self::find_from(&current_dir)
            }
        }
    }

    /// Find hearth.toml in `start` or its ancestors; defaults when there is none
    pub fn find_from(start: &Path) -> Result<Self> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILE);
            if candidate.is_file() {
                return Self::from_file(&candidate);
            }
            if !current.pop() {
                return Ok(Self {
                    config_path: None,
                    config: HearthConfig::default(),
                });
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let config: HearthConfig =
            toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Self {
            config_path: Some(path.to_path_buf()),
            config,
        })
    }

    /// Get the Redis URL, expanding a `${VAR}` reference
    pub fn redis_url(&self) -> Result<String> {
        let url = self.config.redis.url.as_str();

        if url.starts_with("${") && url.ends_with('}') {
            let var_name = &url[2..url.len() - 1];
            match std::env::var(var_name) {
                Ok(value) => Ok(value),
                // The default reference falls back to a local server.
                Err(_) if url == "${REDIS_URL}" => Ok(FALLBACK_REDIS_URL.to_string()),
                Err(_) => anyhow::bail!("Environment variable {var_name} not set"),
            }
        } else {
            Ok(url.to_string())
        }
    }

    pub fn prefix(&self) -> &str {
        &self.config.store.prefix
    }
}
