use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    error::{ConfigError, Result},
    video::RecordingParams,
};

/// Main configuration for motion-fx
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Capture device settings
    pub capture: CaptureConfig,

    /// Recording output settings
    pub recording: RecordingConfig,

    /// Freehand drawing overlay settings
    pub overlay: OverlayConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capture: CaptureConfig::default(),
            recording: RecordingConfig::default(),
            overlay: OverlayConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|_| ConfigError::ParseFailed {
            path: path.display().to_string(),
        })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue {
            key: "config".to_string(),
            value: e.to_string(),
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.capture.validate()?;
        self.recording.validate()?;
        self.overlay.validate()?;
        Ok(())
    }
}

/// Capture device configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Device index (0 = default webcam)
    pub device_index: u32,

    /// Requested frame width
    pub width: u32,

    /// Requested frame height
    pub height: u32,

    /// Requested frame rate
    pub fps: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            device_index: 0,
            width: 640,
            height: 480,
            fps: 30,
        }
    }
}

impl CaptureConfig {
    fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidValue {
                key: "capture.resolution".to_string(),
                value: format!("{}x{}", self.width, self.height),
            }
            .into());
        }
        if self.fps == 0 {
            return Err(ConfigError::InvalidValue {
                key: "capture.fps".to_string(),
                value: self.fps.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Recording output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingConfig {
    /// Playback parameters written to the recording manifest
    pub params: RecordingParams,

    /// Directory recordings land in when no explicit path is given
    pub output_dir: PathBuf,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            params: RecordingParams::default(),
            output_dir: PathBuf::from("recordings"),
        }
    }
}

impl RecordingConfig {
    fn validate(&self) -> Result<()> {
        if self.params.fps <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "recording.fps".to_string(),
                value: self.params.fps.to_string(),
            }
            .into());
        }
        if self.params.resolution.0 == 0 || self.params.resolution.1 == 0 {
            return Err(ConfigError::InvalidValue {
                key: "recording.resolution".to_string(),
                value: format!("{}x{}", self.params.resolution.0, self.params.resolution.1),
            }
            .into());
        }
        Ok(())
    }
}

/// Freehand drawing overlay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Stroke color (RGB)
    pub color: [u8; 3],

    /// Stroke thickness in pixels
    pub thickness: u32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            color: [0, 255, 0],
            thickness: 5,
        }
    }
}

impl OverlayConfig {
    fn validate(&self) -> Result<()> {
        if self.thickness == 0 {
            return Err(ConfigError::InvalidValue {
                key: "overlay.thickness".to_string(),
                value: self.thickness.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test_config.toml");

        let mut original_config = Config::default();
        original_config.capture.width = 1280;
        original_config.overlay.color = [255, 0, 0];

        // Save and load
        original_config.save_to_file(&file_path).unwrap();
        let loaded_config = Config::from_file(&file_path).unwrap();

        assert_eq!(original_config.capture.width, loaded_config.capture.width);
        assert_eq!(original_config.overlay.color, loaded_config.overlay.color);
        assert_eq!(
            original_config.recording.params.fps,
            loaded_config.recording.params.fps
        );
    }

    #[test]
    fn test_missing_file_is_a_config_error() {
        let result = Config::from_file("/nonexistent/config.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_capture_config() {
        let mut config = Config::default();
        config.capture.width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_overlay_thickness() {
        let mut config = Config::default();
        config.overlay.thickness = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_recording_fps() {
        let mut config = Config::default();
        config.recording.params.fps = 0.0;
        assert!(config.validate().is_err());
    }
}
