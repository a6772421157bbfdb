mod types;

pub use types::*;

use crate::apps;
use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    parse_config(&content).with_context(|| format!("Invalid config file: {:?}", path))
}

/// Parse and validate configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).context("Failed to parse config")?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./arrlink.toml",
        "~/.config/arrlink/config.toml",
        "/etc/arrlink/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.namespace.trim().is_empty() {
        anyhow::bail!("namespace cannot be empty");
    }

    if config.domain.trim().is_empty() {
        anyhow::bail!("domain cannot be empty");
    }

    if config.download_client.port == 0 {
        anyhow::bail!("Download client port cannot be 0");
    }

    if config.download_client.name.trim().is_empty() {
        anyhow::bail!("Download client name cannot be empty");
    }

    for (app, url) in &config.overrides {
        if apps::find_app(app).is_none() {
            anyhow::bail!("Override for unknown app '{}'", app);
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            anyhow::bail!("Override for '{}' is not an http(s) URL: {}", app, url);
        }
    }

    Ok(())
}
