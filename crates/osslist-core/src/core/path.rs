use crate::core::error::{OsslistError, OsslistResult};
use std::path::{Path, PathBuf};

/// Get the osslist configuration directory
///
/// Platform-specific locations:
/// - Windows: %APPDATA%\osslist
/// - Linux: ~/.config/osslist
/// - macOS: ~/Library/Application Support/osslist
pub fn osslist_home() -> OsslistResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| OsslistError::Path("Could not determine config directory".to_string()))?;
    Ok(config_dir.join("osslist"))
}

/// Get the config file path (`<osslist_home>/config.yaml`)
pub fn config_file() -> OsslistResult<PathBuf> {
    Ok(osslist_home()?.join("config.yaml"))
}

/// Ensure a directory exists
pub fn ensure_dir(path: &Path) -> OsslistResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
