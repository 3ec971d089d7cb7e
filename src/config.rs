// Global configuration management

use crate::engine::QualityPreset;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// ffmpeg executable (bare name is looked up in PATH)
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: PathBuf,

    /// ffprobe executable, used for media probing and metadata
    #[serde(default = "default_ffprobe")]
    pub ffprobe: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// NVENC preset used when no preset is given and prompting is disabled
    #[serde(default)]
    pub quality_preset: QualityPreset,

    /// Replace existing output files without asking for --overwrite
    #[serde(default)]
    pub overwrite: bool,

    /// Log filter used when neither -v nor RUST_LOG is given
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_ffmpeg() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_ffprobe() -> PathBuf {
    PathBuf::from("ffprobe")
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffmpeg: default_ffmpeg(),
            ffprobe: default_ffprobe(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            quality_preset: QualityPreset::Balanced,
            overwrite: false,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "macos") {
            dirs::home_dir()
                .context("Could not determine home directory")?
                .join(".config")
                .join("ffconvert")
        } else {
            dirs::config_dir()
                .context("Could not determine config directory")?
                .join("ffconvert")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from disk, or create default if it doesn't exist
    pub fn load() -> Result<Self> {
        let (config, save_error) = Self::load_or_create()?;
        if let Some(e) = save_error {
            warn_default_not_saved(&e);
        }
        Ok(config)
    }

    /// Like [`Config::load`], but hands back the error from writing the
    /// default file instead of logging it, for callers that set up logging
    /// from the loaded config
    pub fn load_or_create() -> Result<(Self, Option<anyhow::Error>)> {
        Self::load_or_create_at(&Self::config_path()?)
    }

    pub fn load_or_create_at(path: &Path) -> Result<(Self, Option<anyhow::Error>)> {
        if path.exists() {
            return Ok((Self::load_from(path)?, None));
        }

        // Best effort: an unwritable config dir still leaves usable defaults
        let config = Config::default();
        let save_error = config.save_to(path).err();
        Ok((config, save_error))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save config to disk
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Check if config file exists
    pub fn exists() -> bool {
        Self::config_path().map(|p| p.exists()).unwrap_or(false)
    }

    /// Create a default config file if it doesn't exist
    pub fn ensure_default() -> Result<()> {
        if !Self::exists() {
            Config::default().save()?;
        }
        Ok(())
    }
}

/// Report a failed default-config write; defaults are still in use
pub fn warn_default_not_saved(error: &anyhow::Error) {
    tracing::warn!("Could not create default config file: {:#}", error);
    eprintln!("Using built-in defaults. Run 'ffconvert init-config' to create a config file.");
}
