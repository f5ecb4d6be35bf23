// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the sentry pipeline

use std::fmt;
use std::path::PathBuf;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Camera-related errors
    Camera(CameraError),
    /// Detector invocation and result errors
    Detect(DetectError),
    /// Buzzer/GPIO errors
    Alert(AlertError),
    /// Configuration errors
    Config(String),
    /// Storage/filesystem errors
    Storage(String),
}

/// Camera-specific errors
///
/// `DeviceUnavailable` and `DecodeError` are fatal to a capture session;
/// the session tears down after releasing the device on either.
#[derive(Debug, Clone)]
pub enum CameraError {
    /// Camera device could not be opened
    DeviceUnavailable(String),
    /// Frame could not be read or decoded
    ///
    /// A failed read is always an error, never an empty-but-successful frame.
    DecodeError(String),
    /// Device does not offer a pixel format we can consume
    UnsupportedFormat(String),
}

/// Detector-stage errors, scoped to a single image
///
/// None of these unwind the capture session; the per-image pipeline stops
/// and the next saved image still gets processed.
#[derive(Debug, Clone)]
pub enum DetectError {
    /// Detector process could not be spawned
    Spawn(String),
    /// Detector process exited with a nonzero code
    InvocationFailed(i32),
    /// Detector process exceeded the configured timeout and was killed
    Timeout,
    /// Detector reported success but its label file is missing
    ResultFileMissing(PathBuf),
    /// Label file could not be read mid-stream
    ResultReadFailed(String),
}

/// Buzzer/GPIO errors, fatal to the alert stage only
#[derive(Debug, Clone)]
pub enum AlertError {
    /// GPIO pin could not be initialized as an output
    PinInit(String),
    /// GPIO pin level write failed
    PinWrite(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => write!(f, "Camera error: {}", e),
            AppError::Detect(e) => write!(f, "Detector error: {}", e),
            AppError::Alert(e) => write!(f, "Alert error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::DeviceUnavailable(msg) => write!(f, "Cannot open camera: {}", msg),
            CameraError::DecodeError(msg) => write!(f, "Cannot read frame: {}", msg),
            CameraError::UnsupportedFormat(msg) => write!(f, "Unsupported format: {}", msg),
        }
    }
}

impl fmt::Display for DetectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectError::Spawn(msg) => write!(f, "Failed to start detector: {}", msg),
            DetectError::InvocationFailed(code) => {
                write!(f, "Detector exited with code {}", code)
            }
            DetectError::Timeout => write!(f, "Detector timed out"),
            DetectError::ResultFileMissing(path) => {
                write!(f, "Label file not found: {}", path.display())
            }
            DetectError::ResultReadFailed(msg) => write!(f, "Failed to read labels: {}", msg),
        }
    }
}

impl fmt::Display for AlertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertError::PinInit(msg) => write!(f, "GPIO init failed: {}", msg),
            AlertError::PinWrite(msg) => write!(f, "GPIO write failed: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CameraError {}
impl std::error::Error for DetectError {}
impl std::error::Error for AlertError {}

// Conversions from sub-errors to AppError
impl From<CameraError> for AppError {
    fn from(err: CameraError) -> Self {
        AppError::Camera(err)
    }
}

impl From<DetectError> for AppError {
    fn from(err: DetectError) -> Self {
        AppError::Detect(err)
    }
}

impl From<AlertError> for AppError {
    fn from(err: AlertError) -> Self {
        AppError::Alert(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}
