use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::controls::ControlState;
use crate::render::{ProofOptions, DEFAULT_PNG_FILE_NAME};
use crate::style::DEFAULT_CSS_FILE_NAME;

pub const MAX_DEBOUNCE: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Toml(#[from] toml::de::Error),
}

/// Defaults for every command; CLI flags win when present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub controls: ControlState,
    pub preview: PreviewConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub container_width_px: f64,
    #[serde(with = "humantime_serde")]
    pub debounce: Duration,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            container_width_px: 640.0,
            debounce: Duration::from_millis(150),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub css_file_name: String,
    pub png_file_name: String,
    pub png_width: u32,
    pub png_padding: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        let proof = ProofOptions::default();
        Self {
            css_file_name: DEFAULT_CSS_FILE_NAME.to_string(),
            png_file_name: DEFAULT_PNG_FILE_NAME.to_string(),
            png_width: proof.width_px,
            png_padding: proof.padding_px,
        }
    }
}

impl ExportConfig {
    pub fn proof_options(&self) -> ProofOptions {
        ProofOptions {
            width_px: self.png_width,
            padding_px: self.png_padding,
            ..ProofOptions::default()
        }
    }
}

impl Config {
    /// `~/.config/tpv/config.toml`, when a home directory is known.
    pub fn central_config_path() -> Option<PathBuf> {
        std::env::var_os("HOME")
            .filter(|home| !home.is_empty())
            .map(|home| PathBuf::from(home).join(".config").join("tpv").join("config.toml"))
    }

    /// Priority: explicit path > central config (if it exists) > defaults.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigLoadError> {
        let source = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Self::central_config_path().filter(|p| p.is_file()),
        };
        match source {
            Some(p) => Self::from_toml_str(&std::fs::read_to_string(p)?),
            None => Ok(Config::default()),
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Config, ConfigLoadError> {
        let mut cfg: Config = toml::from_str(raw)?;
        cfg.controls = cfg.controls.normalized();
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), String> {
        let width = self.preview.container_width_px;
        if !width.is_finite() || width <= 0.0 {
            return Err(format!(
                "preview.container_width_px must be a positive number (got {width})"
            ));
        }
        if self.preview.debounce > MAX_DEBOUNCE {
            return Err(format!(
                "preview.debounce must not exceed {}s (got {}ms)",
                MAX_DEBOUNCE.as_secs(),
                self.preview.debounce.as_millis()
            ));
        }
        if self.export.png_width == 0 {
            return Err("export.png_width must be positive".to_string());
        }
        if self.export.css_file_name.trim().is_empty() || self.export.png_file_name.trim().is_empty()
        {
            return Err("export file names must not be empty".to_string());
        }
        Ok(())
    }
}
