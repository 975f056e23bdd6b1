use std::path::{Path, PathBuf};

use super::types::AppConfig;
use crate::error::ConfigError;

pub const CONFIG_ENV: &str = "TSTAMP_CONFIG";

/// `~/.tstamp/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".tstamp").join("config.toml"))
}

pub fn load_default() -> Result<AppConfig, ConfigError> {
    // Priority 1: explicit $TSTAMP_CONFIG, which must exist
    // Priority 2: ~/.tstamp/config.toml
    // Priority 3: ./tstamp.toml
    let explicit = std::env::var_os(CONFIG_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);

    let mut cfg = if let Some(path) = explicit {
        load_from(&path)?
    } else if let Some(path) = user_config_path().filter(|p| p.exists()) {
        load_from(&path)?
    } else if Path::new("tstamp.toml").exists() {
        load_from(Path::new("tstamp.toml"))?
    } else {
        AppConfig::default()
    };

    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok())?;
    Ok(cfg)
}

pub fn load_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str::<AppConfig>(&s).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Applies `TSTAMP_*` overrides. Blank values are ignored.
pub fn apply_env_overrides<F>(cfg: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("TSTAMP_FORMAT") {
        cfg.stamp.format = v.trim().to_string();
    }
    if let Some(v) = get("TSTAMP_UTC") {
        cfg.stamp.utc = parse_bool("TSTAMP_UTC", &v)?;
    }
    if let Some(v) = get("TSTAMP_MILLIS") {
        cfg.stamp.millis = parse_bool("TSTAMP_MILLIS", &v)?;
    }
    if let Some(v) = get("TSTAMP_TABS") {
        cfg.stamp.tabs = parse_bool("TSTAMP_TABS", &v)?;
    }
    if let Some(v) = get("TSTAMP_LOG_LEVEL") {
        cfg.logging.level = v;
    }

    Ok(())
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}
