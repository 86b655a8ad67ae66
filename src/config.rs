//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving the keyboard's
//! configuration in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{APP_NAME, CONFIG_DIR_ENV, DEFAULT_FRAMEBUFFER};
use crate::engine::Theme;
use crate::models::{Anchor, Rotation};

/// Device node configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Framebuffer device node
    pub framebuffer: PathBuf,
    /// Touch device node; discovered automatically when unset
    pub touchscreen: Option<PathBuf>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            framebuffer: PathBuf::from(DEFAULT_FRAMEBUFFER),
            touchscreen: None,
        }
    }
}

/// Placement and rotation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Fixed rotation (0-3); read from the console when unset
    pub rotation: Option<u8>,
    /// Screen edge the keyboard sits on
    pub anchor: Anchor,
    /// Re-layout when the console rotation changes
    pub follow_rotation: bool,
}

impl DisplayConfig {
    /// Configured rotation, if any and valid.
    #[must_use]
    pub fn rotation(&self) -> Option<Rotation> {
        self.rotation.and_then(Rotation::from_index)
    }
}

/// Application configuration.
///
/// Validation rules:
/// - `display.rotation` must be 0-3 when set
/// - theme colors must be `#RRGGBB` (enforced while parsing)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Device nodes
    pub devices: DeviceConfig,
    /// Placement and rotation
    pub display: DisplayConfig,
    /// Colors
    pub theme: Theme,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the config directory path.
    ///
    /// `FBKEYS_CONFIG_DIR` takes precedence; otherwise
    /// `<platform config dir>/fbkeys/`.
    pub fn config_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(APP_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the default config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads configuration from `config_path`, defaulting when absent.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(config_path).context(format!(
            "Failed to read config file: {}",
            config_path.display()
        ))?;

        let config: Self = toml::from_str(&content).context(format!(
            "Failed to parse config file: {}",
            config_path.display()
        ))?;

        config.validate().context(format!(
            "Invalid config file: {}",
            config_path.display()
        ))?;

        Ok(config)
    }

    /// Saves configuration to the default config file.
    pub fn save(&self) -> Result<PathBuf> {
        let config_path = Self::config_file_path()?;
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Saves configuration to `config_path` using atomic write.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(config_dir) = config_path.parent() {
            fs::create_dir_all(config_dir).context(format!(
                "Failed to create config directory: {}",
                config_dir.display()
            ))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        let temp_path = config_path.with_extension("toml.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, config_path).context(format!(
            "Failed to rename temp config file to: {}",
            config_path.display()
        ))?;

        Ok(())
    }

    /// Validates configuration values.
    pub fn validate(&self) -> Result<()> {
        if let Some(rotation) = self.display.rotation {
            if Rotation::from_index(rotation).is_none() {
                anyhow::bail!("Rotation must be between 0 and 3, got {rotation}");
            }
        }

        if self.devices.framebuffer.as_os_str().is_empty() {
            anyhow::bail!("Framebuffer path must not be empty");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RgbColor;
    use tempfile::TempDir;

    #[test]
    fn test_config_new() {
        let config = Config::new();
        assert_eq!(config.devices.framebuffer, PathBuf::from("/dev/fb0"));
        assert_eq!(config.devices.touchscreen, None);
        assert_eq!(config.display.rotation, None);
        assert_eq!(config.display.anchor, Anchor::Bottom);
        assert!(!config.display.follow_rotation);
        assert_eq!(config.theme, Theme::default());
    }

    #[test]
    fn test_config_validate_rotation() {
        let mut config = Config::new();
        assert!(config.validate().is_ok());

        config.display.rotation = Some(3);
        assert!(config.validate().is_ok());
        assert_eq!(
            config.display.rotation(),
            Some(Rotation::CounterClockwiseQuarter)
        );

        config.display.rotation = Some(4);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::new();
        config.devices.touchscreen = Some(PathBuf::from("/dev/input/event3"));
        config.display.rotation = Some(1);
        config.display.anchor = Anchor::Top;
        config.theme.key = RgbColor::new(0x12, 0x34, 0x56);
        config.save_to(&config_file).unwrap();

        assert!(!config_file.with_extension("toml.tmp").exists());
        let loaded = Config::load_from(&config_file).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = Config::load_from(&temp_dir.path().join("config.toml")).unwrap();
        assert_eq!(loaded, Config::new());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        fs::write(
            &config_file,
            "[display]\nanchor = \"top\"\n\n[theme]\nlabel = \"#FF0000\"\n",
        )
        .unwrap();

        let loaded = Config::load_from(&config_file).unwrap();
        assert_eq!(loaded.display.anchor, Anchor::Top);
        assert_eq!(loaded.theme.label, RgbColor::new(0xFF, 0, 0));
        assert_eq!(loaded.theme.key, Theme::default().key);
        assert_eq!(loaded.devices, DeviceConfig::default());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");

        fs::write(&config_file, "[display]\nrotation = 9\n").unwrap();
        let err = Config::load_from(&config_file).unwrap_err();
        assert!(format!("{err:#}").contains("between 0 and 3"));

        fs::write(&config_file, "[theme]\nkey = \"blue\"\n").unwrap();
        assert!(Config::load_from(&config_file).is_err());
    }
}
