// SPDX-License-Identifier: GPL-3.0-only

//! Per-image pipeline: detector -> label file -> buzzer
//!
//! Everything downstream of a saved frame is scoped to that one image.
//! A failed detector run or a missing label file is reported and stops
//! processing for that image only; the capture session and other saved
//! images are unaffected.

pub mod alert;
pub mod detect;
pub mod results;

use crate::backends::gpio::PinDriver;
use crate::config::DetectorConfig;
use crate::storage::LabelContract;
use alert::AlertDriver;
use results::DetectionResult;
use std::path::Path;
use tracing::info;

/// Run detect -> read -> alert for one saved image.
///
/// Returns the parsed result so callers can report what was found. The
/// label path is fixed by the contract before the detector runs; after a
/// successful exit a missing label file is an unexpected-state error.
pub fn run_image_pipeline<P: PinDriver>(
    image: &Path,
    detector: &DetectorConfig,
    alert_driver: &mut AlertDriver<P>,
) -> Result<DetectionResult, crate::errors::AppError> {
    let contract = LabelContract::for_image(image, detector.labels_dir.as_deref());

    detect::invoke(detector, &contract.image)?;

    let result = results::read_labels(&contract.label_path)?;

    info!(
        image = %image.display(),
        labels = result.lines.len(),
        detection = result.has_detection(),
        "Detection pipeline finished"
    );

    alert_driver.fire(&result)?;
    Ok(result)
}
