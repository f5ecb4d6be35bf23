// SPDX-License-Identifier: GPL-3.0-only

//! External detector invocation
//!
//! The detector is a black box: it takes an image path plus model options on
//! its command line and, on success, writes a label file. Invocation blocks
//! the calling thread; an optional timeout kills a hung detector.

use crate::config::DetectorConfig;
use crate::constants::DETECTOR_POLL_INTERVAL;
use crate::errors::DetectError;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Instant;
use tracing::{info, warn};

/// Run the detector on one image and wait for it to finish.
///
/// Exit code 0 maps to `Ok(())`; anything else is `InvocationFailed`. With
/// `timeout_secs` set, the child is polled and killed on expiry.
pub fn invoke(config: &DetectorConfig, image: &Path) -> Result<(), DetectError> {
    let mut command = Command::new(&config.program);
    if !config.script.is_empty() {
        command.arg(&config.script);
    }
    command
        .arg("--weights")
        .arg(&config.weights)
        .arg("--img")
        .arg(config.image_size.to_string())
        .arg("--conf")
        .arg(config.confidence.to_string())
        .arg("--source")
        .arg(image);
    if config.save_labels {
        command.arg("--save-txt");
    }
    command.stdin(Stdio::null());

    info!(image = %image.display(), program = %config.program, "Invoking detector");

    let started = Instant::now();
    let mut child = command
        .spawn()
        .map_err(|e| DetectError::Spawn(format!("{}: {}", config.program, e)))?;

    let status = match config.timeout() {
        None => child
            .wait()
            .map_err(|e| DetectError::Spawn(e.to_string()))?,
        Some(timeout) => loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if started.elapsed() >= timeout {
                        warn!(image = %image.display(), "Detector timed out, killing");
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(DetectError::Timeout);
                    }
                    std::thread::sleep(DETECTOR_POLL_INTERVAL);
                }
                Err(e) => return Err(DetectError::Spawn(e.to_string())),
            }
        },
    };

    if status.success() {
        info!(
            image = %image.display(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Detector finished"
        );
        Ok(())
    } else {
        Err(DetectError::InvocationFailed(status.code().unwrap_or(-1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Write a stub detector script and return a config running it via sh.
    /// The script sees the real detector flags but is free to ignore them.
    fn stub_config(dir: &Path, body: &str) -> DetectorConfig {
        let script = dir.join("detect.sh");
        std::fs::write(&script, format!("#!/bin/sh\n{}\n", body)).unwrap();
        DetectorConfig {
            program: "sh".to_string(),
            script: script.to_string_lossy().into_owned(),
            ..DetectorConfig::default()
        }
    }

    #[test]
    fn zero_exit_is_success() {
        let dir = tempfile::tempdir().unwrap();
        let config = stub_config(dir.path(), "exit 0");
        invoke(&config, Path::new("image1.jpg")).unwrap();
    }

    #[test]
    fn nonzero_exit_is_invocation_failed() {
        let dir = tempfile::tempdir().unwrap();
        let config = stub_config(dir.path(), "exit 3");
        match invoke(&config, Path::new("image1.jpg")) {
            Err(DetectError::InvocationFailed(code)) => assert_eq!(code, 3),
            other => panic!("expected InvocationFailed, got {:?}", other),
        }
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let config = DetectorConfig {
            program: "/nonexistent/detector".to_string(),
            script: String::new(),
            ..DetectorConfig::default()
        };
        assert!(matches!(
            invoke(&config, Path::new("image1.jpg")),
            Err(DetectError::Spawn(_))
        ));
    }

    #[test]
    fn hung_detector_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = stub_config(dir.path(), "sleep 30");
        config.timeout_secs = Some(1);
        let started = Instant::now();
        assert!(matches!(
            invoke(&config, Path::new("image1.jpg")),
            Err(DetectError::Timeout)
        ));
        assert!(started.elapsed() < std::time::Duration::from_secs(10));
    }
}
