use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub editor: EditorConfig,
    pub status: StatusConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditorConfig {
    pub blink_on_ms: u64,
    pub blink_off_ms: u64,
    pub line_numbers: bool,
    pub tab_width: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusConfig {
    /// Connection labels shown in the status bar, e.g. engine then database.
    pub breadcrumbs: Vec<String>,
}

const DEFAULTS: &str = include_str!("../../config/default.toml");

impl AppConfig {
    /// Load configuration with layering: defaults → user config.
    pub fn load() -> Result<Self> {
        let mut config = Self::defaults()?;

        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "krab") {
            let config_path = proj_dirs.config_dir().join("config.toml");
            if config_path.exists() {
                config = Self::from_path(&config_path)?;
                tracing::info!("loaded config from {}", config_path.display());
            }
        }

        Ok(config)
    }

    pub fn defaults() -> Result<Self> {
        toml::from_str(DEFAULTS).context("embedded default config is invalid")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn blink_on(&self) -> Duration {
        Duration::from_millis(self.editor.blink_on_ms)
    }

    pub fn blink_off(&self) -> Duration {
        Duration::from_millis(self.editor.blink_off_ms)
    }
}
