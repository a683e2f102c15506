//! DGE Configuration
//!
//! Config file: `$DGE_CONFIG`, `~/.config/dge/config.toml` or
//! `/etc/dge/config.toml`, first one found wins.
//!
//! ```toml
//! [storage]
//! data_dir = "/home/agent/.local/share/dge"
//!
//! [player]
//! default_address = "demo_k2j4h1"
//!
//! [output]
//! color = "auto"
//!
//! [logging]
//! level = "info"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Overrides the config file location
pub const CONFIG_ENV: &str = "DGE_CONFIG";

/// Overrides the data directory
pub const DATA_DIR_ENV: &str = "DGE_DATA_DIR";

/// Color display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Colors when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Address used when `--address` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub color: ColorMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DgeConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DgeConfig {
    /// User config path: ~/.config/dge/config.toml
    pub fn user_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Cannot determine config directory")?;
        Ok(config_dir.join("dge").join("config.toml"))
    }

    /// System config path: /etc/dge/config.toml
    pub fn system_config_path() -> PathBuf {
        PathBuf::from("/etc/dge/config.toml")
    }

    /// Load configuration
    ///
    /// Priority:
    /// 1. `$DGE_CONFIG`
    /// 2. User config (~/.config/dge/config.toml)
    /// 3. System config (/etc/dge/config.toml)
    /// 4. Defaults
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::load_from(Path::new(&path));
        }

        if let Ok(user_path) = Self::user_config_path() {
            if user_path.exists() {
                return Self::load_from(&user_path);
            }
        }

        let system_path = Self::system_config_path();
        if system_path.exists() {
            return Self::load_from(&system_path);
        }

        Ok(Self::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Path `save` writes to: `$DGE_CONFIG` or the user config
    pub fn writable_path() -> Result<PathBuf> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) => Ok(PathBuf::from(path)),
            Err(_) => Self::user_config_path(),
        }
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::writable_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let toml_string =
            toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        fs::write(path, toml_string)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Data directory: `$DGE_DATA_DIR`, then `storage.data_dir`, then the
    /// platform data dir
    pub fn data_dir(&self) -> PathBuf {
        self.resolve_data_dir(std::env::var(DATA_DIR_ENV).ok())
    }

    fn resolve_data_dir(&self, env_override: Option<String>) -> PathBuf {
        if let Some(dir) = env_override.filter(|d| !d.is_empty()) {
            return PathBuf::from(dir);
        }
        if let Some(dir) = &self.storage.data_dir {
            return dir.clone();
        }
        dirs::data_dir()
            .map(|d| d.join("dge"))
            .unwrap_or_else(|| PathBuf::from(".dge"))
    }

    pub fn set_color_mode(&mut self, mode: &str) -> Result<()> {
        self.output.color = match mode.to_lowercase().as_str() {
            "auto" => ColorMode::Auto,
            "always" | "on" | "yes" | "true" => ColorMode::Always,
            "never" | "off" | "no" | "false" | "none" => ColorMode::Never,
            _ => anyhow::bail!(
                "Invalid color mode: '{}'. Valid values: auto, always, never",
                mode
            ),
        };
        Ok(())
    }

    pub fn set_log_level(&mut self, level: &str) -> Result<()> {
        let level = level.to_lowercase();
        match level.as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => self.logging.level = level,
            _ => anyhow::bail!(
                "Invalid log level: '{}'. Valid values: error, warn, info, debug, trace",
                level
            ),
        }
        Ok(())
    }

    /// Set a value by dotted key, e.g. `output.color=never`
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "storage.data_dir" => {
                self.storage.data_dir = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            "player.default_address" => {
                self.player.default_address = (!value.is_empty()).then(|| value.to_string());
            }
            "output.color" => self.set_color_mode(value)?,
            "logging.level" => self.set_log_level(value)?,
            _ => anyhow::bail!(
                "Unknown config key: '{}'. Valid keys: storage.data_dir, player.default_address, output.color, logging.level",
                key
            ),
        }
        Ok(())
    }
}
