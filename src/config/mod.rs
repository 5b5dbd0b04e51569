//! Configuration module for VizualNetwork
//!
//! Handles loading settings from YAML files and environment variables.

mod settings;

pub use settings::*;

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable naming an explicit settings file
pub const SETTINGS_PATH_ENV: &str = "VIZUAL_SETTINGS_PATH";

/// Candidate locations searched when no explicit path is given
pub fn default_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
        PathBuf::from("/etc/vizualnetwork/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("vizualnetwork/settings.yml"));
    }
    paths
}

/// Load settings from an explicit file, the environment, the default
/// locations, or fall back to defaults. Environment overrides always apply,
/// and the result is validated.
pub fn load(explicit: Option<&Path>) -> Result<Settings> {
    if let Some(path) = explicit {
        if !path.exists() {
            anyhow::bail!("Settings file not found: {}", path.display());
        }
    }

    let from_env = std::env::var(SETTINGS_PATH_ENV).ok().map(PathBuf::from);

    let candidates = explicit
        .map(Path::to_path_buf)
        .into_iter()
        .chain(from_env)
        .chain(default_paths());

    for path in candidates {
        if path.exists() {
            info!("Loading settings from: {}", path.display());
            let mut settings = Settings::from_file(&path)?;
            settings.merge_env();
            settings.validate()?;
            return Ok(settings);
        }
    }

    info!("No settings file found, using defaults");
    let mut settings = Settings::default();
    settings.merge_env();
    settings.validate()?;
    Ok(settings)
}
