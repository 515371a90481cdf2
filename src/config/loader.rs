use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::config::AppConfig;

const CONFIG_DIR: &str = "sharepick";
const CONFIG_FILE: &str = "config.toml";

pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(CONFIG_DIR))
}

pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join(CONFIG_FILE))
}

pub fn load() -> color_eyre::Result<AppConfig> {
    let Some(path) = config_path() else {
        debug!("No config directory found, using defaults");
        return Ok(AppConfig::default());
    };

    if !path.exists() {
        debug!("Config file not found at {:?}, using defaults", path);
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(&path)?;
    let config = parse(&content)?;
    debug!("Loaded config from {:?}", path);
    Ok(config)
}

pub fn parse(content: &str) -> color_eyre::Result<AppConfig> {
    Ok(toml::from_str(content)?)
}
