//! Path utilities and file system helpers

use std::path::PathBuf;

/// Environment variable that relocates all panel data (tests, portable installs)
pub const DATA_DIR_ENV: &str = "FAREAPP_DATA_DIR";

/// Gets the application data directory
pub fn get_app_data_dir() -> Result<PathBuf, String> {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::data_dir()
        .map(|p| p.join("it.fareapp.admin"))
        .ok_or_else(|| "Could not find app data directory".to_string())
}

/// Gets the key-value store database path
pub fn get_store_db_path() -> Result<PathBuf, String> {
    get_app_data_dir().map(|p| p.join("store.db"))
}

/// Gets the panel settings file path
pub fn get_settings_path() -> Result<PathBuf, String> {
    get_app_data_dir().map(|p| p.join("settings.json"))
}
