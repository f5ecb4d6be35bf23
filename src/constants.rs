// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Default camera device index (`/dev/video0`)
pub const DEFAULT_DEVICE_INDEX: usize = 0;

/// Default BCM pin driving the buzzer
pub const DEFAULT_BUZZER_PIN: u8 = 32;

/// Default buzzer pulse duration
///
/// One alert is HIGH for this long, then LOW for the same duration.
pub const DEFAULT_ALERT_DURATION: Duration = Duration::from_millis(500);

/// Default detector program
pub const DEFAULT_DETECTOR_PROGRAM: &str = "python3";

/// Default detector entry script
pub const DEFAULT_DETECTOR_SCRIPT: &str = "detect.py";

/// Default detector weights file
pub const DEFAULT_WEIGHTS: &str = "yolov5s-fp16.tflite";

/// Default inference image size (square)
pub const DEFAULT_IMAGE_SIZE: u32 = 640;

/// Default confidence threshold handed to the detector
pub const DEFAULT_CONFIDENCE: f32 = 0.25;

/// Capture format negotiated with the camera
///
/// 640x480 keeps per-frame conversion cheap; the preview downsamples
/// anyway and the detector rescales to its own input size.
pub const CAPTURE_WIDTH: u32 = 640;
pub const CAPTURE_HEIGHT: u32 = 480;

/// Bound on each key poll in the preview loop (~60 Hz refresh)
pub const KEY_POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Interval between child-process liveness checks while a detector runs
pub const DETECTOR_POLL_INTERVAL: Duration = Duration::from_millis(100);
