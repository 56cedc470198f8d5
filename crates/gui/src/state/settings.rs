//! Application settings

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shared::{ConfigError, HauntedConfig, ParticleConfig, ScrollConfig, TrainerConfig};
use thiserror::Error;

use super::DemoKind;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(#[from] ConfigError),
}

/// Viewport settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    /// Background color RGB
    pub background_color: [u8; 3],
    /// Show the debug panel on start-up
    pub debug_panel: bool,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            background_color: [0, 0, 0],
            debug_panel: true,
        }
    }
}

/// UI settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Font size in points
    pub font_size: f32,
    /// Use English labels
    pub english: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            english: true,
        }
    }
}

/// All application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppSettings {
    /// Demo shown on start-up
    pub demo: DemoKind,
    pub trainer: TrainerConfig,
    pub particles: ParticleConfig,
    pub scroll: ScrollConfig,
    pub haunted: HauntedConfig,
    pub viewport: ViewportSettings,
    pub ui: UiSettings,
    /// Directory holding `textures/particles/*.png`
    pub asset_dir: Option<PathBuf>,
}

impl AppSettings {
    fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "scene-demos", "scene-demos")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from the user config dir, or return default if missing or broken
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        Self::load_or_default(&path)
    }

    /// Load from `path`, logging and falling back to defaults on any error
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Ignoring settings at {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Load and validate settings from a specific file
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.trainer.validate()?;
        self.particles.validate()?;
        self.scroll.validate()?;
        self.haunted.validate()
    }

    /// Save settings to the user config dir
    pub fn save(&self) {
        if let Some(path) = Self::default_path() {
            if let Err(e) = self.save_to(&path) {
                tracing::warn!("Failed to save settings to {}: {e}", path.display());
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Where particle sprites are looked up
    pub fn asset_dir(&self) -> PathBuf {
        self.asset_dir.clone().unwrap_or_else(|| PathBuf::from("assets"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("scene-demos-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_file("roundtrip.json");
        let mut settings = AppSettings::default();
        settings.demo = DemoKind::Particles;
        settings.trainer.trials_per_session = 5;
        settings.save_to(&path).unwrap();

        let loaded = AppSettings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let path = temp_file("invalid.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{"particles": {"count": 5}}"#).unwrap();

        let err = AppSettings::load_from(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(ConfigError::OutOfRange { .. })));
        assert_eq!(AppSettings::load_or_default(&path), AppSettings::default());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_broken_json_falls_back() {
        let path = temp_file("broken.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(AppSettings::load_from(&path), Err(SettingsError::Parse(_))));
        assert_eq!(AppSettings::load_or_default(&path), AppSettings::default());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = temp_file("does-not-exist.json");
        assert!(matches!(AppSettings::load_from(&path), Err(SettingsError::Io(_))));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings: AppSettings = serde_json::from_str(r#"{"demo": "particles"}"#).unwrap();
        assert_eq!(settings.demo, DemoKind::Particles);
        assert_eq!(settings.trainer, TrainerConfig::default());
        assert_eq!(settings.asset_dir(), PathBuf::from("assets"));
    }
}
