use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use crate::models::settings::Settings;

pub const ENV_ACCESS_TOKEN: &str = "SLOTGRID_ACCESS_TOKEN";
pub const ENV_API_URL: &str = "SLOTGRID_API_URL";

const SETTINGS_FILE: &str = "settings.toml";

pub struct SettingsService {
    path: PathBuf,
}

impl SettingsService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Service bound to `<config dir>/settings.toml`, or the working directory
    /// when no platform config directory can be resolved.
    pub fn from_default_location() -> Self {
        let path = match ProjectDirs::from("com", "Slotgrid", "Slotgrid") {
            Some(dirs) => dirs.config_dir().join(SETTINGS_FILE),
            None => {
                log::warn!("Unable to resolve project directory; using current dir for settings");
                PathBuf::from(SETTINGS_FILE)
            }
        };
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings from disk, falling back to defaults when the file does
    /// not exist, then apply environment overrides.
    pub fn get(&self) -> Result<Settings> {
        let mut settings = if self.path.exists() {
            let data = fs::read_to_string(&self.path)
                .with_context(|| format!("failed to read settings from {}", self.path.display()))?;
            toml::from_str::<Settings>(&data)
                .with_context(|| format!("failed to parse settings from {}", self.path.display()))?
        } else {
            log::info!("No settings file at {}, using defaults", self.path.display());
            Settings::default()
        };

        apply_env_overrides(&mut settings, |key| std::env::var(key).ok());

        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;
        Ok(settings)
    }

    /// Write settings to disk, creating parent directories as needed.
    pub fn update(&self, settings: &Settings) -> Result<()> {
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create dir {}", parent.display()))?;
            }
        }

        let data = toml::to_string_pretty(settings).context("failed to serialize settings")?;
        fs::write(&self.path, data)
            .with_context(|| format!("failed to write settings to {}", self.path.display()))?;
        Ok(())
    }
}

fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(token) = lookup(ENV_ACCESS_TOKEN).filter(|t| !t.trim().is_empty()) {
        settings.access_token = Some(token);
    }
    if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
        settings.api_base_url = url;
    }
}
