//! Configuration persistence for markshot settings

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Serializable color representation used for annotations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Default for ShapeColor {
    fn default() -> Self {
        Self::BLACK
    }
}

impl ShapeColor {
    pub const BLACK: ShapeColor = ShapeColor {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    pub const RED: ShapeColor = ShapeColor {
        r: 1.0,
        g: 0.0,
        b: 0.0,
    };

    /// Build from 8-bit channels
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Convert to image crate RGBA format (0-255)
    pub fn to_rgba_u8(self) -> [u8; 4] {
        [
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            255,
        ]
    }
}

/// Application configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Folder the save dialog starts in
    #[serde(default = "default_save_folder")]
    pub default_save_folder: PathBuf,
    /// Extension of saved screenshots without the dot ("png", "jpg", ...)
    #[serde(default = "default_file_extension")]
    pub file_extension: String,
    /// Font used for text annotations (None = search system fonts)
    #[serde(default)]
    pub font_path: Option<PathBuf>,
    /// Initial text size in pixels
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    /// Initial stroke width in pixels
    #[serde(default = "default_stroke_width")]
    pub stroke_width: u32,
}

fn default_save_folder() -> PathBuf {
    dirs::picture_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join("Pictures")))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_file_extension() -> String {
    "png".to_string()
}

fn default_font_size() -> u32 {
    16
}

fn default_stroke_width() -> u32 {
    5
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_save_folder: default_save_folder(),
            file_extension: default_file_extension(),
            font_path: None,
            font_size: default_font_size(),
            stroke_width: default_stroke_width(),
        }
    }
}

impl AppConfig {
    /// Directory name under the platform config dir
    pub const ID: &'static str = "markshot";

    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(Self::ID).join("config.json"))
    }

    /// Load configuration from the default location, or return defaults if unavailable
    pub fn load() -> Self {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                log::warn!("No config directory available, using defaults");
                Self::default()
            }
        }
    }

    /// Load configuration from `path`, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::read(path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {err:#}");
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Save configuration to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
    }

    /// Save configuration to the default location
    pub fn save(&self) {
        let Some(path) = Self::default_path() else {
            log::error!("Could not determine config directory for saving");
            return;
        };
        if let Err(err) = self.save_to(&path) {
            log::error!("Failed to save config: {err:#}");
        }
    }
}

/// Read-only access to configuration, consulted at save time
pub trait ConfigSource {
    fn load_config(&self) -> AppConfig;
}

/// Configuration backed by a JSON file
#[derive(Debug, Clone)]
pub struct JsonConfig {
    path: Option<PathBuf>,
}

impl JsonConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }
}

impl Default for JsonConfig {
    fn default() -> Self {
        Self {
            path: AppConfig::default_path(),
        }
    }
}

impl ConfigSource for JsonConfig {
    fn load_config(&self) -> AppConfig {
        match &self.path {
            Some(path) => AppConfig::load_from(path),
            None => AppConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("nope.json"));
        assert_eq!(config.file_extension, "png");
        assert_eq!(config.font_size, 16);
        assert_eq!(config.stroke_width, 5);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"default_save_folder": "/tmp/shots", "file_extension": "jpg"}"#,
        )
        .unwrap();

        let config = JsonConfig::new(&path).load_config();
        assert_eq!(config.default_save_folder, PathBuf::from("/tmp/shots"));
        assert_eq!(config.file_extension, "jpg");
        assert_eq!(config.stroke_width, 5);
    }

    #[test]
    fn test_malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(AppConfig::load_from(&path).file_extension, "png");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = AppConfig {
            file_extension: "jpeg".to_string(),
            font_size: 22,
            ..AppConfig::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(AppConfig::load_from(&path), config);
    }

    #[test]
    fn test_color_conversion() {
        assert_eq!(ShapeColor::from_rgb8(255, 0, 128).to_rgba_u8(), [255, 0, 128, 255]);
        assert_eq!(ShapeColor::default().to_rgba_u8(), [0, 0, 0, 255]);
    }
}
