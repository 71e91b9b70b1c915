use crate::devices::DEFAULT_DEVICE;
use crate::model::ProjectMode;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "pocket-atelier";

/// User settings read from `config.yml`. Every key is optional.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub default_mode: ProjectMode,
    pub default_device: String,
    pub log_filter: String,
    pub data_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            default_mode: ProjectMode::Wallpaper,
            default_device: DEFAULT_DEVICE.to_string(),
            log_filter: "warn".to_string(),
            data_file: None,
        }
    }
}

impl AppConfig {
    pub fn load_default() -> Result<Self> {
        match config_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Missing file means defaults; a file that does not parse is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
        let config: AppConfig =
            serde_yaml::from_str(&data).with_context(|| format!("parsing {:?}", path))?;
        Ok(config)
    }

    /// Where the project collection lives: explicit override, then the
    /// configured file, then the platform data directory.
    pub fn resolve_data_file(&self, override_path: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(path) = override_path.or_else(|| self.data_file.clone()) {
            return Ok(path);
        }
        let dirs = project_dirs().context("locating data directory")?;
        Ok(dirs.data_dir().join("projects.json"))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME)
}

pub fn config_path() -> Option<PathBuf> {
    project_dirs().map(|d| d.config_dir().join("config.yml"))
}
