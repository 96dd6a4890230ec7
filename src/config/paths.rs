use std::path::PathBuf;

use super::error::ConfigError;

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Location of the config file: the explicit override, or
/// `~/.config/toolchat/config.toml`.
pub fn config_file(path_override: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    match path_override {
        Some(path) => Ok(path),
        None => Ok(default_config_dir()?.join(CONFIG_FILE_NAME)),
    }
}

fn default_config_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::MissingHome)?;
    Ok(home.join(".config").join("toolchat"))
}
