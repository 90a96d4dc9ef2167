use std::path::{Path, PathBuf};

use super::types::AppConfig;

/// Get the default framecast data directory: ~/.framecast
pub fn get_framecast_data_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(PathBuf::from(home).join(".framecast"))
}

pub fn load_from_path(path: &Path) -> anyhow::Result<AppConfig> {
    let s = std::fs::read_to_string(path)?;
    Ok(toml::from_str::<AppConfig>(&s)?)
}

pub fn load_default() -> anyhow::Result<AppConfig> {
    // Priority 1: ~/.framecast/config.toml (highest)
    let data_dir = get_framecast_data_dir()?;
    let user_config = data_dir.join("config.toml");

    // Priority 2: ./config.toml (current directory)
    let local_config = Path::new("config.toml");

    let mut cfg = if user_config.exists() {
        load_from_path(&user_config)?
    } else if local_config.exists() {
        load_from_path(local_config)?
    } else {
        AppConfig::default()
    };

    if cfg.registry.store_path.trim().is_empty() {
        cfg.registry.store_path = data_dir
            .join("providers.json")
            .to_string_lossy()
            .to_string();
    }

    // Environment variable overrides (Priority 0: highest)
    if let Ok(v) = std::env::var("FRAMECAST_STORE_PATH") {
        if !v.trim().is_empty() {
            cfg.registry.store_path = v;
        }
    }
    if let Ok(v) = std::env::var("FRAMECAST_LOG_LEVEL") {
        if !v.trim().is_empty() {
            cfg.logging.level = v;
        }
    }

    Ok(cfg)
}
