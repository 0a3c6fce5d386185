//! Config path resolution
//!
//! All paths hang off the bot's base directory, which the host supplies.

use std::path::{Path, PathBuf};

/// Returns the configs directory.
///
/// Path: `{base}/configs/`
pub fn configs_dir(base: &Path) -> PathBuf {
    base.join("configs")
}

/// Returns the core config path.
///
/// Path: `{base}/configs/core.toml`
pub fn core_config_path(base: &Path) -> PathBuf {
    configs_dir(base).join("core.toml")
}

/// Returns the path for a plugin's config file.
///
/// Path: `{base}/configs/plugins/{plugin_name}/{plugin_name}.toml`
pub fn plugin_config_path(base: &Path, plugin_name: &str) -> PathBuf {
    configs_dir(base)
        .join("plugins")
        .join(plugin_name)
        .join(format!("{}.toml", plugin_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_config_path() {
        let path = core_config_path(Path::new("/opt/gnomebot"));
        assert_eq!(path, PathBuf::from("/opt/gnomebot/configs/core.toml"));
    }

    #[test]
    fn test_plugin_config_path_format() {
        let path = plugin_config_path(Path::new("/opt/gnomebot"), "auto_loot");
        assert!(path.ends_with("configs/plugins/auto_loot/auto_loot.toml"));
    }
}
