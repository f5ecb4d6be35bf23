// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for sentry operations
//!
//! This module provides command-line functionality for:
//! - Running a full capture/detect/alert session
//! - Listing available cameras
//! - Running the detection pipeline on an existing image

use crate::backends::camera::enumerate_devices;
use crate::backends::gpio::SysfsPin;
use crate::config::PipelineConfig;
use crate::errors::AppResult;
use crate::pipelines::{self, alert::AlertDriver};
use crate::terminal;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

/// Run the interactive session, then process every saved frame.
///
/// Per-image failures are reported and skipped; they never abort the run.
/// Ctrl+C between images stops processing the rest.
pub fn watch(config: &PipelineConfig) -> AppResult<()> {
    let outcome = terminal::run_session(&config.capture)?;

    if outcome.saved.is_empty() {
        println!("No frames saved.");
        return Ok(());
    }

    println!("Saved {} frame(s), running detector...", outcome.saved.len());

    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_clone = stop_flag.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        stop_flag_clone.store(true, Ordering::SeqCst);
    }) {
        warn!("Could not install Ctrl+C handler: {}", e);
    }

    let mut alert = AlertDriver::new(SysfsPin::new(), &config.alert);

    for image in &outcome.saved {
        if stop_flag.load(Ordering::SeqCst) {
            println!("Interrupted, skipping remaining images.");
            break;
        }
        process_image(image, config, &mut alert);
    }

    Ok(())
}

/// Run the detection pipeline on an existing image file
pub fn scan(config: &PipelineConfig, image: &Path) -> AppResult<()> {
    let mut alert = AlertDriver::new(SysfsPin::new(), &config.alert);
    let result = pipelines::run_image_pipeline(image, &config.detector, &mut alert)?;

    if result.has_detection() {
        println!("{}: {} detection(s)", image.display(), result.lines.len());
        for line in &result.lines {
            println!("  {}", line);
        }
    } else {
        println!("{}: nothing detected", image.display());
    }
    Ok(())
}

/// List all available cameras
pub fn list() -> AppResult<()> {
    let devices = enumerate_devices();

    if devices.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    println!("Available cameras:");
    for device in &devices {
        println!("  [{}] {} ({}, {})", device.index, device.card, device.driver, device.path);
    }
    Ok(())
}

/// One image's detect/read/alert run; errors are reported, not propagated
fn process_image(
    image: &Path,
    config: &PipelineConfig,
    alert: &mut AlertDriver<SysfsPin>,
) {
    match pipelines::run_image_pipeline(image, &config.detector, alert) {
        Ok(result) if result.has_detection() => {
            println!("{}: {} detection(s)", image.display(), result.lines.len());
        }
        Ok(_) => {
            println!("{}: nothing detected", image.display());
        }
        Err(e) => {
            eprintln!("{}: {}", image.display(), e);
        }
    }
}
