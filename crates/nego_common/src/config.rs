//! negoctl configuration
//!
//! Lives in `$XDG_CONFIG_HOME/negoctl/config.toml` unless overridden with
//! `--config` or `$NEGOCTL_CONFIG`. Every field has a default, so an absent
//! file is the same as an empty one.

use crate::error::{NegoError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR_NAME: &str = "negoctl";
const CONFIG_FILE: &str = "config.toml";

pub const CONFIG_ENV: &str = "NEGOCTL_CONFIG";
pub const BACKEND_URL_ENV: &str = "NEGOCTL_BACKEND_URL";

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendSettings {
    #[serde(default = "default_backend_url")]
    pub url: String,

    /// Request timeout (seconds, valid: 1-600)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl BackendSettings {
    pub fn effective_timeout_secs(&self) -> u64 {
        self.timeout_secs.clamp(1, 600)
    }
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Defaults for `negoctl negotiate` and the create commands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegotiationSettings {
    #[serde(default = "default_negotiator_version")]
    pub negotiator_version: String,

    #[serde(default = "default_num_satellites")]
    pub num_satellites: u32,

    #[serde(default = "default_num_tasks")]
    pub num_tasks: u32,
}

fn default_negotiator_version() -> String {
    "v031".to_string()
}

fn default_num_satellites() -> u32 {
    3
}

fn default_num_tasks() -> u32 {
    5
}

impl Default for NegotiationSettings {
    fn default() -> Self {
        Self {
            negotiator_version: default_negotiator_version(),
            num_satellites: default_num_satellites(),
            num_tasks: default_num_tasks(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NegoConfig {
    #[serde(default)]
    pub backend: BackendSettings,

    #[serde(default)]
    pub negotiation: NegotiationSettings,

    #[serde(default)]
    pub log: LogConfig,
}

impl NegoConfig {
    /// Load config.
    ///
    /// An explicit path must exist and parse. A discovered file that fails to
    /// parse is skipped with a warning. `$NEGOCTL_BACKEND_URL` is applied last.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = match explicit_path {
            Some(path) => Self::load_from(path)?,
            None => match discover_config_path() {
                Some(path) if path.exists() => Self::load_from(&path).unwrap_or_else(|e| {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "ignoring unreadable config"
                    );
                    Self::default()
                }),
                _ => Self::default(),
            },
        };

        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            if !url.trim().is_empty() {
                config.backend.url = url.trim().to_string();
            }
        }

        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| NegoError::Config(format!("{}: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| NegoError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| NegoError::Config(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// Config path with fallback chain
///
/// Priority:
/// 1. $NEGOCTL_CONFIG
/// 2. $XDG_CONFIG_HOME/negoctl/config.toml
/// 3. ~/.config/negoctl/config.toml
pub fn discover_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.is_empty() {
            return Some(PathBuf::from(xdg).join(CONFIG_DIR_NAME).join(CONFIG_FILE));
        }
    }

    dirs::home_dir().map(|home| home.join(".config").join(CONFIG_DIR_NAME).join(CONFIG_FILE))
}
