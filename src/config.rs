// Configuration management

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::AppConfig;

pub const BACKEND_URL_ENV: &str = "BACKEND_URL";

pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
        .join("recipechat");

    fs::create_dir_all(&config_dir).context("Failed to create config directory")?;

    Ok(config_dir)
}

pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.toml"))
}

pub fn get_log_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("recipechat.log"))
}

/// Load the config from `path`, or from the default location when `None`.
/// A missing file is created with defaults. `BACKEND_URL` is applied last.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let config_path = match path {
        Some(path) => path.to_path_buf(),
        None => get_config_path()?,
    };

    let mut config = load_config_from(&config_path)?;
    apply_env_overrides(&mut config);
    Ok(config)
}

pub fn load_config_from(config_path: &Path) -> Result<AppConfig> {
    if !config_path.exists() {
        let default_config = AppConfig::default();
        save_config_to(&default_config, config_path)?;
        return Ok(default_config);
    }

    let contents = fs::read_to_string(config_path).context("Failed to read config file")?;

    let config: AppConfig = toml::from_str(&contents).context("Failed to parse config file")?;

    Ok(config)
}

pub fn save_config_to(config: &AppConfig, config_path: &Path) -> Result<()> {
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(config_path, contents).context("Failed to write config file")?;

    Ok(())
}

pub fn apply_env_overrides(config: &mut AppConfig) {
    if let Ok(backend_url) = std::env::var(BACKEND_URL_ENV) {
        config.backend_url = Some(backend_url);
    }
}
