//! Storage Layer
//!
//! Locates the per-user configuration directory.

use anyhow::Result;
use std::path::PathBuf;

/// File name of the configuration file inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "imagerecognizer", "ImageRecognizer")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    Ok(proj_dirs.config_dir().to_path_buf())
}

/// Get the default configuration file path
pub fn default_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_path() {
        // No home directory in some CI sandboxes; nothing to check there.
        if let Ok(path) = default_config_path() {
            assert!(path.ends_with(CONFIG_FILE_NAME));
            assert!(path.starts_with(get_config_dir().unwrap()));
        }
    }
}
