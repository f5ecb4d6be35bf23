// SPDX-License-Identifier: GPL-3.0-only

//! User configuration handling
//!
//! Defaults come from [`crate::constants`]; a JSON config file can override
//! them, and CLI flags override the file. Missing fields fall back to their
//! defaults via serde.

use crate::constants;
use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Capture session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Camera device index (`/dev/video<N>`)
    pub device_index: usize,
    /// Directory where saved frames land
    pub output_dir: PathBuf,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            device_index: constants::DEFAULT_DEVICE_INDEX,
            output_dir: PathBuf::from("."),
        }
    }
}

/// External detector settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Interpreter or binary to run (e.g., "python3")
    pub program: String,
    /// Detector entry script, empty when `program` is the detector itself
    pub script: String,
    /// Model weights file
    pub weights: PathBuf,
    /// Square inference size in pixels
    pub image_size: u32,
    /// Confidence threshold in [0, 1]
    pub confidence: f32,
    /// Ask the detector to persist label files
    pub save_labels: bool,
    /// Optional directory the detector writes label files into;
    /// `None` means next to the source image
    pub labels_dir: Option<PathBuf>,
    /// Kill the detector after this many seconds; `None` waits forever
    pub timeout_secs: Option<u64>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            program: constants::DEFAULT_DETECTOR_PROGRAM.to_string(),
            script: constants::DEFAULT_DETECTOR_SCRIPT.to_string(),
            weights: PathBuf::from(constants::DEFAULT_WEIGHTS),
            image_size: constants::DEFAULT_IMAGE_SIZE,
            confidence: constants::DEFAULT_CONFIDENCE,
            save_labels: true,
            labels_dir: None,
            timeout_secs: None,
        }
    }
}

impl DetectorConfig {
    /// Timeout as a `Duration`, if configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Buzzer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// BCM pin number driving the buzzer
    pub pin: u8,
    /// HIGH (and following LOW) hold duration in milliseconds
    pub duration_ms: u64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            pin: constants::DEFAULT_BUZZER_PIN,
            duration_ms: constants::DEFAULT_ALERT_DURATION.as_millis() as u64,
        }
    }
}

impl AlertConfig {
    /// Pulse hold duration as a `Duration`
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Top-level pipeline configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub capture: CaptureConfig,
    pub detector: DetectorConfig,
    pub alert: AlertConfig,
}

impl PipelineConfig {
    /// Load configuration from a JSON file
    ///
    /// Out-of-range confidence values are clamped to [0, 1] rather than
    /// rejected, so a sloppy hand-edited file still runs.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        let mut config: PipelineConfig = serde_json::from_str(&raw)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        config.detector.confidence = config.detector.confidence.clamp(0.0, 1.0);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = PipelineConfig::default();
        assert_eq!(config.alert.pin, 32);
        assert_eq!(config.alert.duration(), Duration::from_millis(500));
        assert_eq!(config.detector.image_size, 640);
        assert!(config.detector.save_labels);
        assert!(config.detector.timeout_secs.is_none());
    }

    #[test]
    fn load_clamps_confidence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"detector": {"confidence": 3.5}}"#).unwrap();

        let config = PipelineConfig::load(&path).unwrap();
        assert_eq!(config.detector.confidence, 1.0);
        // Untouched sections keep their defaults
        assert_eq!(config.alert.pin, 32);
    }

    #[test]
    fn load_missing_file_is_config_error() {
        let err = PipelineConfig::load(Path::new("/nonexistent/config.json")).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
