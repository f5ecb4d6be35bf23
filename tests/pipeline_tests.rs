// SPDX-License-Identifier: GPL-3.0-only

//! End-to-end pipeline tests with a stubbed detector
//!
//! The detector is replaced by a small shell script that writes (or does
//! not write) the label file the contract expects; the buzzer pin is an
//! in-memory recorder.

use sentry_cam::backends::gpio::{Level, MemoryPin};
use sentry_cam::config::{AlertConfig, DetectorConfig};
use sentry_cam::errors::{AppError, DetectError};
use sentry_cam::pipelines::{alert::AlertDriver, run_image_pipeline};
use std::path::PathBuf;

struct Fixture {
    _dir: tempfile::TempDir,
    image: PathBuf,
    detector: DetectorConfig,
    pin: MemoryPin,
    alert: AlertDriver<MemoryPin>,
}

/// Build an image file plus a stub detector running `body` via sh.
/// `$LABELS` inside `body` expands to the contract's label path.
fn fixture(body: &str) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("image1.jpg");
    std::fs::write(&image, b"jpeg bytes").unwrap();

    let labels = dir.path().join("image1.txt");
    let script = dir.path().join("detect.sh");
    std::fs::write(
        &script,
        format!("#!/bin/sh\nLABELS='{}'\n{}\n", labels.display(), body),
    )
    .unwrap();

    let detector = DetectorConfig {
        program: "sh".to_string(),
        script: script.to_string_lossy().into_owned(),
        ..DetectorConfig::default()
    };

    let alert_config = AlertConfig {
        pin: 32,
        duration_ms: 1,
    };
    let pin = MemoryPin::new();
    let alert = AlertDriver::new(pin.clone(), &alert_config);

    Fixture {
        _dir: dir,
        image,
        detector,
        pin,
        alert,
    }
}

#[test]
fn detection_line_produces_one_buzzer_pulse() {
    let mut fx = fixture(r#"echo 'person 0.91 10 20 30 40' > "$LABELS""#);

    let result = run_image_pipeline(&fx.image, &fx.detector, &mut fx.alert).unwrap();

    assert!(result.has_detection());
    assert_eq!(result.lines, vec!["person 0.91 10 20 30 40"]);
    assert_eq!(fx.pin.writes(), vec![(32, Level::High), (32, Level::Low)]);
}

#[test]
fn empty_label_file_keeps_buzzer_quiet() {
    let mut fx = fixture(r#": > "$LABELS""#);

    let result = run_image_pipeline(&fx.image, &fx.detector, &mut fx.alert).unwrap();

    assert!(!result.has_detection());
    assert!(fx.pin.writes().is_empty());
}

#[test]
fn failed_detector_halts_before_labels_and_alert() {
    let mut fx = fixture("exit 5");

    let err = run_image_pipeline(&fx.image, &fx.detector, &mut fx.alert).unwrap_err();

    assert!(matches!(
        err,
        AppError::Detect(DetectError::InvocationFailed(5))
    ));
    assert!(fx.pin.writes().is_empty());
    assert_eq!(fx.pin.init_count(), 0);
}

#[test]
fn successful_detector_without_label_file_is_unexpected_state() {
    let mut fx = fixture("exit 0");

    let err = run_image_pipeline(&fx.image, &fx.detector, &mut fx.alert).unwrap_err();

    assert!(matches!(
        err,
        AppError::Detect(DetectError::ResultFileMissing(_))
    ));
    assert!(fx.pin.writes().is_empty());
}

#[test]
fn two_images_two_pulses_one_pin_init() {
    let mut fx = fixture(r#"echo 'dog 0.70 5 5 20 20' > "$LABELS""#);

    run_image_pipeline(&fx.image, &fx.detector, &mut fx.alert).unwrap();
    run_image_pipeline(&fx.image, &fx.detector, &mut fx.alert).unwrap();

    assert_eq!(fx.pin.init_count(), 1);
    assert_eq!(
        fx.pin.writes(),
        vec![
            (32, Level::High),
            (32, Level::Low),
            (32, Level::High),
            (32, Level::Low),
        ]
    );
}

#[test]
fn open_failure_never_starts_a_session() {
    // Device index far beyond anything present on a build machine
    let err = sentry_cam::backends::camera::FrameSource::open(9999).unwrap_err();
    assert!(matches!(
        err,
        sentry_cam::errors::CameraError::DeviceUnavailable(_)
    ));
}
