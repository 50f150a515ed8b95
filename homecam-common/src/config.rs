//! Configuration loading and hub URL resolution

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Resolve the hub base URL following the priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file (`hub_url` key)
/// 4. Compiled default (fallback)
pub fn resolve_hub_url(cli_arg: Option<&str>, env_var_name: &str) -> String {
    resolve_with_config(cli_arg, env_var_name, locate_config_file().ok().as_deref())
}

/// Resolution against an explicit config file, so the lookup on the
/// running machine stays out of the priority logic
fn resolve_with_config(
    cli_arg: Option<&str>,
    env_var_name: &str,
    config_path: Option<&Path>,
) -> String {
    // Priority 1: Command-line argument
    if let Some(url) = cli_arg {
        return normalize_base_url(url);
    }

    // Priority 2: Environment variable
    if let Ok(url) = std::env::var(env_var_name) {
        if !url.is_empty() {
            return normalize_base_url(&url);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = config_path {
        if let Ok(toml_content) = std::fs::read_to_string(path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(url) = config.get("hub_url").and_then(|v| v.as_str()) {
                    return normalize_base_url(url);
                }
            }
        }
    }

    // Priority 4: Compiled default
    DEFAULT_HUB_URL.to_string()
}

/// Default hub address when nothing else is configured
pub const DEFAULT_HUB_URL: &str = "http://127.0.0.1:5000";

/// Strip a trailing slash so joined paths don't double up
fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Locate the platform config file (`homecam/config.toml`)
fn locate_config_file() -> Result<PathBuf> {
    let user_config = dirs::config_dir()
        .map(|d| d.join("homecam").join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;

    if user_config.exists() {
        return Ok(user_config);
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/homecam/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config(format!(
        "Config file not found: {:?}",
        user_config
    )))
}
