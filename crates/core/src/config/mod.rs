//! Configuration for the event core and its plugins
//!
//! - Type-safe config structs via serde
//! - TOML file format
//! - Default config written on first load
//! - Manual reload
//!
//! # Example
//!
//! ```ignore
//! use serde::{Deserialize, Serialize};
//! use gnomebot_core::PluginConfig;
//!
//! #[derive(Default, Serialize, Deserialize)]
//! pub struct AutoLootConfig {
//!     pub loot_radius: f32,
//!     pub skin_corpses: bool,
//! }
//!
//! impl PluginConfig for AutoLootConfig {
//!     const PLUGIN_NAME: &'static str = "auto_loot";
//! }
//!
//! let config = AutoLootConfig::load(base_dir).unwrap_or_default();
//! ```

mod loader;

use std::path::Path;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

pub use loader::{configs_dir, core_config_path, plugin_config_path};

/// Configuration system errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read or write config file
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML content
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config to TOML
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Load a TOML file, writing `T::default()` there first if it is missing.
fn load_or_create<T>(path: &Path) -> ConfigResult<T>
where
    T: Default + Serialize + DeserializeOwned,
{
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config: T = toml::from_str(&content)?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    } else {
        let default = T::default();
        write_toml(path, &default)?;
        tracing::info!("Created default config at {:?}", path);
        Ok(default)
    }
}

fn write_toml<T: Serialize>(path: &Path, value: &T) -> ConfigResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = toml::to_string_pretty(value)?;
    std::fs::write(path, content)?;
    tracing::debug!("Saved config to {:?}", path);
    Ok(())
}

fn read_toml<T: DeserializeOwned>(path: &Path) -> ConfigResult<T> {
    let content = std::fs::read_to_string(path)?;
    let config = toml::from_str(&content)?;
    tracing::debug!("Reloaded config from {:?}", path);
    Ok(config)
}

/// Trait for plugin configuration types.
///
/// Plugins typically reload their config when they receive a
/// `PluginConfig` event.
///
/// # File Location
///
/// `{base}/configs/plugins/{PLUGIN_NAME}/{PLUGIN_NAME}.toml`
pub trait PluginConfig: Default + Serialize + DeserializeOwned + Send + Sync {
    /// The plugin name used for config file path resolution.
    const PLUGIN_NAME: &'static str;

    /// Load config from file, creating default if missing.
    fn load(base: &Path) -> ConfigResult<Self> {
        load_or_create(&plugin_config_path(base, Self::PLUGIN_NAME))
    }

    /// Save config to file.
    ///
    /// Creates parent directories if they don't exist.
    fn save(&self, base: &Path) -> ConfigResult<()> {
        write_toml(&plugin_config_path(base, Self::PLUGIN_NAME), self)
    }

    /// Reload config from file.
    fn reload(&mut self, base: &Path) -> ConfigResult<()> {
        *self = read_toml(&plugin_config_path(base, Self::PLUGIN_NAME))?;
        Ok(())
    }
}

/// Core event system configuration.
///
/// Loaded from `{base}/configs/core.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Config version for future migration support
    pub version: u32,

    /// Enable debug logging
    pub debug: bool,

    /// Handlers running longer than this are logged as slow
    pub slow_handler_warn_ms: u64,

    /// Explicit tracing filter directive, overrides `debug`
    pub log_filter: Option<String>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            version: 1,
            debug: false,
            slow_handler_warn_ms: 5,
            log_filter: None,
        }
    }
}

impl CoreConfig {
    /// Load core config from `path`, creating default if missing.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        load_or_create(path)
    }

    /// Load core config from the standard location under `base`.
    pub fn load(base: &Path) -> ConfigResult<Self> {
        Self::load_from(&core_config_path(base))
    }

    /// Save core config to `path`.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        write_toml(path, self)
    }

    /// Reload core config from `path`.
    pub fn reload_from(&mut self, path: &Path) -> ConfigResult<()> {
        *self = read_toml(path)?;
        Ok(())
    }

    /// Tracing filter directive implied by this config
    pub fn log_directive(&self) -> &str {
        match &self.log_filter {
            Some(filter) => filter.as_str(),
            None if self.debug => "debug",
            None => "info",
        }
    }
}
