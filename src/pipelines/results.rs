// SPDX-License-Identifier: GPL-3.0-only

//! Detector label-file parsing

use crate::errors::DetectError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Parsed outcome of one detector run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectionResult {
    /// Non-empty label lines, trimmed, in file order
    pub lines: Vec<String>,
}

impl DetectionResult {
    /// True iff the detector produced at least one non-empty label line.
    ///
    /// An empty or whitespace-only file is a valid "nothing found" result.
    pub fn has_detection(&self) -> bool {
        !self.lines.is_empty()
    }
}

/// Read the label file named by the contract.
///
/// The file is streamed line by line and closed on every path. A missing
/// file is `ResultFileMissing`; an empty file parses to a no-detection
/// result, which is not an error.
pub fn read_labels(path: &Path) -> Result<DetectionResult, DetectError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(DetectError::ResultFileMissing(path.to_path_buf()));
        }
        Err(e) => return Err(DetectError::ResultReadFailed(e.to_string())),
    };

    let reader = BufReader::new(file);
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(|e| DetectError::ResultReadFailed(e.to_string()))?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_string());
        }
    }

    debug!(path = %path.display(), labels = lines.len(), "Parsed label file");
    Ok(DetectionResult { lines })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_lines_are_trimmed_and_ordered() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image1.txt");
        std::fs::write(&path, "person 0.91 10 20 30 40\n  dog 0.55 1 2 3 4  \n").unwrap();

        let result = read_labels(&path).unwrap();
        assert!(result.has_detection());
        assert_eq!(
            result.lines,
            vec!["person 0.91 10 20 30 40", "dog 0.55 1 2 3 4"]
        );
    }

    #[test]
    fn empty_file_means_no_detection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image1.txt");
        std::fs::write(&path, "").unwrap();

        let result = read_labels(&path).unwrap();
        assert!(!result.has_detection());
    }

    #[test]
    fn whitespace_only_file_means_no_detection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image1.txt");
        std::fs::write(&path, "\n   \n\t\n").unwrap();

        let result = read_labels(&path).unwrap();
        assert!(!result.has_detection());
    }

    #[test]
    fn missing_file_is_distinct_error() {
        let err = read_labels(Path::new("/nonexistent/image1.txt")).unwrap_err();
        assert!(matches!(err, DetectError::ResultFileMissing(_)));
    }
}
