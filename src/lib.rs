// SPDX-License-Identifier: GPL-3.0-only

//! sentry-cam - an edge-device capture/detect/alert pipeline
//!
//! Capture frames from a camera with an interactive terminal preview, save
//! frames on demand, hand each saved image to an external object detector,
//! parse the detector's label file, and pulse a GPIO buzzer when something
//! was found.
//!
//! # Architecture
//!
//! - [`backends`]: camera capture (V4L2) and GPIO output
//! - [`terminal`]: the interactive capture session
//! - [`pipelines`]: per-image detector invocation, label parsing, alerting
//! - [`storage`]: saved-frame naming and the image-to-label contract
//! - [`config`]: user configuration handling
//! - [`errors`]: the error taxonomy

pub mod backends;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod pipelines;
pub mod storage;
pub mod terminal;

// Re-export commonly used types
pub use config::{AlertConfig, CaptureConfig, DetectorConfig, PipelineConfig};
pub use errors::{AlertError, AppError, AppResult, CameraError, DetectError};
pub use pipelines::results::DetectionResult;
pub use storage::{LabelContract, SessionStore};
