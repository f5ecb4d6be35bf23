// SPDX-License-Identifier: GPL-3.0-only

//! Storage utilities: saved-frame naming and the image-to-label contract

use crate::errors::AppError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Allocates unique `image<N>.jpg` paths for one capture session.
///
/// `N` is a strictly increasing per-session counter starting at 1. Wall-clock
/// derived names can collide when two saves land in the same second; the
/// counter cannot.
#[derive(Debug)]
pub struct SessionStore {
    output_dir: PathBuf,
    next_id: u64,
}

impl SessionStore {
    /// Create a store rooted at `output_dir`, creating the directory if needed
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir)
            .map_err(|e| AppError::Storage(format!("{}: {}", output_dir.display(), e)))?;
        Ok(Self {
            output_dir,
            next_id: 1,
        })
    }

    /// Hand out the next save path; never repeats within a session
    pub fn allocate(&mut self) -> PathBuf {
        let path = self.output_dir.join(format!("image{}.jpg", self.next_id));
        self.next_id += 1;
        debug!(path = %path.display(), "Allocated save path");
        path
    }

    /// Directory this session saves into
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

/// The contract between the detector invocation and the label reader.
///
/// The label path is derived from the image path exactly once, here, and the
/// same value is handed to both sides, so the two can never disagree about
/// where the labels live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelContract {
    /// Source image handed to the detector
    pub image: PathBuf,
    /// Label file the detector is expected to produce
    pub label_path: PathBuf,
}

impl LabelContract {
    /// Build the contract for one image.
    ///
    /// The label file carries the image's base name with a `.txt` extension,
    /// in `labels_dir` when given, otherwise next to the image.
    pub fn for_image(image: &Path, labels_dir: Option<&Path>) -> Self {
        let label_name = image.with_extension("txt");
        let label_path = match (labels_dir, label_name.file_name()) {
            (Some(dir), Some(name)) => dir.join(name),
            _ => label_name,
        };
        Self {
            image: image.to_path_buf(),
            label_path,
        }
    }
}
