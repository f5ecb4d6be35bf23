// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for label parsing and the image-to-label contract

use sentry_cam::pipelines::results::read_labels;
use sentry_cam::storage::LabelContract;
use std::path::Path;

#[test]
fn contract_and_reader_agree_on_label_path() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("image1.jpg");
    std::fs::write(&image, b"not really a jpeg").unwrap();

    let contract = LabelContract::for_image(&image, None);
    std::fs::write(&contract.label_path, "person 0.91 10 20 30 40\n").unwrap();

    let result = read_labels(&contract.label_path).unwrap();
    assert!(result.has_detection());
    assert_eq!(result.lines, vec!["person 0.91 10 20 30 40"]);
}

#[test]
fn empty_label_file_reads_as_no_detection() {
    let dir = tempfile::tempdir().unwrap();
    let contract = LabelContract::for_image(&dir.path().join("image1.jpg"), None);
    std::fs::write(&contract.label_path, "").unwrap();

    let result = read_labels(&contract.label_path).unwrap();
    assert!(!result.has_detection());
    assert!(result.lines.is_empty());
}

#[test]
fn missing_label_file_is_an_error_not_a_crash() {
    let contract = LabelContract::for_image(Path::new("/nonexistent/image1.jpg"), None);
    assert!(read_labels(&contract.label_path).is_err());
}

#[test]
fn contract_follows_the_image_base_name() {
    let contract = LabelContract::for_image(Path::new("/data/captures/image7.jpg"), None);
    assert_eq!(
        contract.label_path,
        Path::new("/data/captures/image7.txt")
    );

    let routed = LabelContract::for_image(
        Path::new("/data/captures/image7.jpg"),
        Some(Path::new("/data/labels")),
    );
    assert_eq!(routed.label_path, Path::new("/data/labels/image7.txt"));
}
